//! PostgreSQL-backed `LeadRepository` implementation using Diesel ORM.
//!
//! A claim transaction owns one pooled connection from `BEGIN` until commit
//! or rollback. `get_for_update` issues `SELECT ... FOR UPDATE`, so a second
//! claimant on the same row blocks inside PostgreSQL until the first
//! transaction ends; claimants on other rows are unaffected.
//!
//! A transaction handle dropped without `commit` returns its connection to
//! the pool with the transaction still open. The pool manager treats such a
//! connection as broken and closes it, which makes PostgreSQL abort the
//! transaction.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AnsiTransactionManager, AsyncPgConnection, RunQueryDsl, TransactionManager};
use pagination::PageRequest;
use tracing::error;

use crate::domain::ports::{
    ConditionalUpdate, LeadClaimTransaction, LeadRepository, LeadRepositoryError,
};
use crate::domain::{Lead, LeadId, LeadSubmission, UserId};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{LeadClaimUpdate, LeadRow, NewLeadRow};
use super::pool::{DbPool, OwnedConnection, PoolError};
use super::schema::leads;

/// Diesel-backed implementation of the `LeadRepository` port.
#[derive(Clone)]
pub struct DieselLeadRepository {
    pool: DbPool,
}

impl DieselLeadRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> LeadRepositoryError {
    map_basic_pool_error(error, |message| LeadRepositoryError::connection(message))
}

/// Map Diesel errors to domain repository errors.
///
/// A foreign-key violation can only come from `claimed_by`, so it names a
/// claimant with no `users` row.
fn map_diesel_error(error: diesel::result::Error) -> LeadRepositoryError {
    if let Some(ConstraintViolation::ForeignKey { constraint }) = constraint_violation(&error) {
        return LeadRepositoryError::unknown_claimant(constraint);
    }
    map_basic_diesel_error(
        error,
        LeadRepositoryError::query,
        LeadRepositoryError::connection,
    )
}

/// Convert a row, refusing rows that break the lead invariants.
fn row_to_lead(row: LeadRow) -> Result<Lead, LeadRepositoryError> {
    let id = row.id;
    Lead::try_from(row).map_err(|err| {
        error!(lead_id = id, error = %err, "corrupt lead row");
        LeadRepositoryError::query(format!("corrupt lead row: {err}"))
    })
}

fn rows_to_leads(rows: Vec<LeadRow>) -> Result<Vec<Lead>, LeadRepositoryError> {
    rows.into_iter().map(row_to_lead).collect()
}

fn count_to_u64(count: i64) -> Result<u64, LeadRepositoryError> {
    u64::try_from(count)
        .map_err(|_| LeadRepositoryError::query(format!("negative row count {count}")))
}

/// One open PostgreSQL transaction used by a single claim attempt.
pub struct DieselLeadClaimTransaction {
    conn: OwnedConnection,
}

impl DieselLeadClaimTransaction {
    async fn begin(mut conn: OwnedConnection) -> Result<Self, LeadRepositoryError> {
        <AnsiTransactionManager as TransactionManager<AsyncPgConnection>>::begin_transaction(
            &mut conn,
        )
        .await
        .map_err(map_diesel_error)?;
        Ok(Self { conn })
    }

    fn connection(&mut self) -> &mut AsyncPgConnection {
        &mut self.conn
    }
}

#[async_trait]
impl LeadClaimTransaction for DieselLeadClaimTransaction {
    async fn get_for_update(&mut self, id: LeadId) -> Result<Option<Lead>, LeadRepositoryError> {
        let row: Option<LeadRow> = leads::table
            .find(id.get())
            .select(LeadRow::as_select())
            .for_update()
            .get_result(self.connection())
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_lead).transpose()
    }

    async fn update_if_unclaimed(
        &mut self,
        id: LeadId,
        user: &UserId,
    ) -> Result<ConditionalUpdate, LeadRepositoryError> {
        let changes = LeadClaimUpdate {
            claimed_by: *user.as_uuid(),
            is_public: false,
            updated_at: Utc::now(),
        };

        let row: Option<LeadRow> = diesel::update(
            leads::table
                .filter(leads::id.eq(id.get()))
                .filter(leads::claimed_by.is_null()),
        )
        .set(&changes)
        .returning(LeadRow::as_returning())
        .get_result(self.connection())
        .await
        .optional()
        .map_err(map_diesel_error)?;

        match row {
            Some(row) => row_to_lead(row).map(ConditionalUpdate::Applied),
            None => Ok(ConditionalUpdate::NoRowsAffected),
        }
    }

    async fn commit(mut self: Box<Self>) -> Result<(), LeadRepositoryError> {
        <AnsiTransactionManager as TransactionManager<AsyncPgConnection>>::commit_transaction(
            self.connection(),
        )
        .await
        .map_err(map_diesel_error)
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), LeadRepositoryError> {
        <AnsiTransactionManager as TransactionManager<AsyncPgConnection>>::rollback_transaction(
            self.connection(),
        )
        .await
        .map_err(map_diesel_error)
    }
}

#[async_trait]
impl LeadRepository for DieselLeadRepository {
    async fn insert(&self, submission: &LeadSubmission) -> Result<Lead, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewLeadRow {
            name: submission.name(),
            email: submission.email(),
            course_interest: submission.course_interest(),
            message: submission.message(),
        };

        let row: LeadRow = diesel::insert_into(leads::table)
            .values(&new_row)
            .returning(LeadRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_lead(row)
    }

    async fn begin_claim(&self) -> Result<Box<dyn LeadClaimTransaction>, LeadRepositoryError> {
        let conn = self.pool.get_owned().await.map_err(map_pool_error)?;
        let tx = DieselLeadClaimTransaction::begin(conn).await?;
        Ok(Box::new(tx))
    }

    async fn list_unclaimed(&self, page: PageRequest) -> Result<Vec<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LeadRow> = leads::table
            .filter(leads::claimed_by.is_null())
            .filter(leads::is_public.eq(true))
            .order((leads::created_at.desc(), leads::id.asc()))
            .limit(page.sql_limit())
            .offset(page.sql_offset())
            .select(LeadRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_leads(rows)
    }

    async fn count_unclaimed(&self) -> Result<u64, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = leads::table
            .filter(leads::claimed_by.is_null())
            .filter(leads::is_public.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        count_to_u64(count)
    }

    async fn list_claimed_by(
        &self,
        user: &UserId,
        page: PageRequest,
    ) -> Result<Vec<Lead>, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LeadRow> = leads::table
            .filter(leads::claimed_by.eq(user.as_uuid()))
            .order((leads::created_at.desc(), leads::id.asc()))
            .limit(page.sql_limit())
            .offset(page.sql_offset())
            .select(LeadRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_leads(rows)
    }

    async fn count_claimed_by(&self, user: &UserId) -> Result<u64, LeadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let count: i64 = leads::table
            .filter(leads::claimed_by.eq(user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        count_to_u64(count)
    }
}
