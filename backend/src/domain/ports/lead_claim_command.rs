//! Driving port for claiming leads.
//!
//! A claim either transfers an unclaimed lead to the caller or reports why it
//! could not. Conflicts are ordinary outcomes rather than errors so callers
//! can shape their own responses.

use async_trait::async_trait;

use crate::domain::{Error, Lead, LeadId, UserId};

/// Outcome of a single claim attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The caller now owns the lead.
    Claimed(Lead),
    /// No lead has this identifier.
    NotFound,
    /// Another claim won first.
    ///
    /// `current` carries the committed state when it was observed under the
    /// row lock; it is `None` when the conditional write lost without a read.
    AlreadyClaimed {
        /// Lead as observed by the losing attempt.
        current: Option<Lead>,
    },
}

/// Domain use-case port for claiming leads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadClaimCommand: Send + Sync {
    /// Attempt to take ownership of `id` on behalf of `user`.
    ///
    /// At most one attempt per lead ever returns [`ClaimOutcome::Claimed`].
    async fn claim(&self, id: LeadId, user: &UserId) -> Result<ClaimOutcome, Error>;
}

/// Fixture command used when no store is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeadClaimCommand;

#[async_trait]
impl LeadClaimCommand for FixtureLeadClaimCommand {
    async fn claim(&self, _id: LeadId, _user: &UserId) -> Result<ClaimOutcome, Error> {
        Ok(ClaimOutcome::NotFound)
    }
}
