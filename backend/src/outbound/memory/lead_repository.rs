//! In-process `LeadRepository` used when no database is configured.
//!
//! Each lead keeps its committed value next to a row lock. A claim
//! transaction takes the row lock as an owned guard, stages its write, and
//! publishes it only on commit, which mirrors `SELECT ... FOR UPDATE` plus a
//! guarded `UPDATE` closely enough for the claim protocol. Listings read the
//! committed values and never wait on row locks.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageRequest;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::ports::{
    ConditionalUpdate, LeadClaimTransaction, LeadRepository, LeadRepositoryError,
};
use crate::domain::{Lead, LeadId, LeadRecord, LeadSubmission, UserId};

struct LeadSlot {
    row_lock: Arc<Mutex<()>>,
    committed: RwLock<Lead>,
}

#[derive(Default)]
struct Store {
    last_id: i64,
    leads: BTreeMap<LeadId, Arc<LeadSlot>>,
}

impl Store {
    fn slot(&self, id: LeadId) -> Option<Arc<LeadSlot>> {
        self.leads.get(&id).map(Arc::clone)
    }
}

/// Thread-safe in-memory lead store.
#[derive(Clone, Default)]
pub struct InMemoryLeadRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryLeadRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn committed_leads(&self) -> Vec<Lead> {
        let slots: Vec<Arc<LeadSlot>> = self.store.read().await.leads.values().cloned().collect();
        let mut leads = Vec::with_capacity(slots.len());
        for slot in slots {
            leads.push(slot.committed.read().await.clone());
        }
        leads
    }

    async fn page_where(&self, page: PageRequest, keep: impl Fn(&Lead) -> bool) -> Vec<Lead> {
        let mut leads: Vec<Lead> = self
            .committed_leads()
            .await
            .into_iter()
            .filter(|lead| keep(lead))
            .collect();
        leads.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        leads.into_iter().skip(offset).take(limit).collect()
    }

    async fn count_where(&self, keep: impl Fn(&Lead) -> bool) -> u64 {
        let matching = self
            .committed_leads()
            .await
            .iter()
            .filter(|lead| keep(lead))
            .count();
        u64::try_from(matching).unwrap_or(u64::MAX)
    }
}

fn is_unclaimed(lead: &Lead) -> bool {
    lead.claimed_by().is_none() && lead.is_public()
}

struct HeldRow {
    id: LeadId,
    slot: Arc<LeadSlot>,
    _guard: OwnedMutexGuard<()>,
    staged: Option<Lead>,
}

/// Claim transaction over [`InMemoryLeadRepository`].
///
/// Dropping the handle releases its row locks and discards staged writes.
pub struct InMemoryLeadClaimTransaction {
    store: Arc<RwLock<Store>>,
    held: Vec<HeldRow>,
}

impl InMemoryLeadClaimTransaction {
    /// Lock the row for `id`, reusing a lock this transaction already holds.
    async fn lock_row(&mut self, id: LeadId) -> Option<&mut HeldRow> {
        if let Some(index) = self.held.iter().position(|row| row.id == id) {
            return self.held.get_mut(index);
        }

        let slot = self.store.read().await.slot(id)?;
        let guard = Arc::clone(&slot.row_lock).lock_owned().await;
        self.held.push(HeldRow {
            id,
            slot,
            _guard: guard,
            staged: None,
        });
        self.held.last_mut()
    }
}

async fn visible_value(row: &HeldRow) -> Lead {
    match &row.staged {
        Some(lead) => lead.clone(),
        None => row.slot.committed.read().await.clone(),
    }
}

#[async_trait]
impl LeadClaimTransaction for InMemoryLeadClaimTransaction {
    async fn get_for_update(&mut self, id: LeadId) -> Result<Option<Lead>, LeadRepositoryError> {
        match self.lock_row(id).await {
            Some(row) => Ok(Some(visible_value(row).await)),
            None => Ok(None),
        }
    }

    async fn update_if_unclaimed(
        &mut self,
        id: LeadId,
        user: &UserId,
    ) -> Result<ConditionalUpdate, LeadRepositoryError> {
        let Some(row) = self.lock_row(id).await else {
            return Ok(ConditionalUpdate::NoRowsAffected);
        };

        let current = visible_value(row).await;
        match current.claimed(user, Utc::now()) {
            Some(updated) => {
                row.staged = Some(updated.clone());
                Ok(ConditionalUpdate::Applied(updated))
            }
            None => Ok(ConditionalUpdate::NoRowsAffected),
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), LeadRepositoryError> {
        for row in self.held {
            if let Some(lead) = row.staged {
                *row.slot.committed.write().await = lead;
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), LeadRepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl LeadRepository for InMemoryLeadRepository {
    async fn insert(&self, submission: &LeadSubmission) -> Result<Lead, LeadRepositoryError> {
        let mut store = self.store.write().await;
        let id = store.last_id + 1;
        let now = Utc::now();
        let lead = Lead::try_from(LeadRecord {
            id,
            name: submission.name().to_owned(),
            email: submission.email().to_owned(),
            course_interest: submission.course_interest().to_owned(),
            message: submission.message().map(str::to_owned),
            claimed_by: None,
            is_public: true,
            created_at: now,
            updated_at: now,
        })
        .map_err(|err| LeadRepositoryError::query(format!("corrupt lead: {err}")))?;

        store.last_id = id;
        store.leads.insert(
            lead.id(),
            Arc::new(LeadSlot {
                row_lock: Arc::new(Mutex::new(())),
                committed: RwLock::new(lead.clone()),
            }),
        );
        Ok(lead)
    }

    async fn begin_claim(&self) -> Result<Box<dyn LeadClaimTransaction>, LeadRepositoryError> {
        Ok(Box::new(InMemoryLeadClaimTransaction {
            store: Arc::clone(&self.store),
            held: Vec::new(),
        }))
    }

    async fn list_unclaimed(&self, page: PageRequest) -> Result<Vec<Lead>, LeadRepositoryError> {
        Ok(self.page_where(page, is_unclaimed).await)
    }

    async fn count_unclaimed(&self) -> Result<u64, LeadRepositoryError> {
        Ok(self.count_where(is_unclaimed).await)
    }

    async fn list_claimed_by(
        &self,
        user: &UserId,
        page: PageRequest,
    ) -> Result<Vec<Lead>, LeadRepositoryError> {
        Ok(self
            .page_where(page, |lead| lead.claimed_by() == Some(user))
            .await)
    }

    async fn count_claimed_by(&self, user: &UserId) -> Result<u64, LeadRepositoryError> {
        Ok(self
            .count_where(|lead| lead.claimed_by() == Some(user))
            .await)
    }
}

#[cfg(test)]
#[path = "lead_repository_tests.rs"]
mod tests;
