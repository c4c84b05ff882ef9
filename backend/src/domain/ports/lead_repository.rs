//! Driven port for lead storage and the claim transaction primitives.
//!
//! The claim protocol needs two guards from storage: an exclusive read that
//! holds a row lock until the transaction ends, and a conditional write that
//! only applies while the lead is still unclaimed. Both live on
//! [`LeadClaimTransaction`], opened per claim attempt by
//! [`LeadRepository::begin_claim`].

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Lead, LeadId, LeadSubmission, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by lead repository adapters.
    pub enum LeadRepositoryError {
        /// Storage could not be reached or the connection dropped.
        Connection { message: String } => "lead repository connection failed: {message}",
        /// Query or mutation failed, or returned a corrupt row.
        Query { message: String } => "lead repository query failed: {message}",
        /// The claimant named in a write has no user row.
        UnknownClaimant { message: String } => "lead claimant does not exist: {message}",
    }
}

/// Result of [`LeadClaimTransaction::update_if_unclaimed`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalUpdate {
    /// The row was unclaimed and now belongs to the caller.
    Applied(Lead),
    /// The guard `claimed_by IS NULL` matched no row.
    NoRowsAffected,
}

/// One open storage transaction scoped to a single claim attempt.
///
/// Dropping the handle without calling [`commit`](Self::commit) must discard
/// any write made through it.
#[async_trait]
pub trait LeadClaimTransaction: Send {
    /// Read a lead and hold an exclusive row lock until the transaction ends.
    async fn get_for_update(&mut self, id: LeadId) -> Result<Option<Lead>, LeadRepositoryError>;

    /// Assign `user` as owner if the lead is still unclaimed.
    async fn update_if_unclaimed(
        &mut self,
        id: LeadId,
        user: &UserId,
    ) -> Result<ConditionalUpdate, LeadRepositoryError>;

    /// Publish the transaction's writes and release its locks.
    async fn commit(self: Box<Self>) -> Result<(), LeadRepositoryError>;

    /// Discard the transaction's writes and release its locks.
    async fn rollback(self: Box<Self>) -> Result<(), LeadRepositoryError>;
}

/// Port for durable lead storage.
///
/// Listings order by `created_at` descending with ties broken by `id`
/// ascending, so repeated calls on unchanged data return the same pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Store a new unclaimed, public lead.
    async fn insert(&self, submission: &LeadSubmission) -> Result<Lead, LeadRepositoryError>;

    /// Open a transaction for one claim attempt.
    async fn begin_claim(&self) -> Result<Box<dyn LeadClaimTransaction>, LeadRepositoryError>;

    /// Page through leads with no owner.
    async fn list_unclaimed(&self, page: PageRequest) -> Result<Vec<Lead>, LeadRepositoryError>;

    /// Number of leads with no owner.
    async fn count_unclaimed(&self) -> Result<u64, LeadRepositoryError>;

    /// Page through leads owned by `user`.
    async fn list_claimed_by(
        &self,
        user: &UserId,
        page: PageRequest,
    ) -> Result<Vec<Lead>, LeadRepositoryError>;

    /// Number of leads owned by `user`.
    async fn count_claimed_by(&self, user: &UserId) -> Result<u64, LeadRepositoryError>;
}
