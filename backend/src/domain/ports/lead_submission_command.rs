//! Driving port for public lead submissions.

use async_trait::async_trait;

use crate::domain::{Error, Lead, LeadDraft, LeadSubmission};

/// Domain use-case port for recording a visitor's enquiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadSubmissionCommand: Send + Sync {
    /// Validate and store a draft, returning the stored lead.
    ///
    /// Invalid drafts fail with an `invalid_request` error whose details list
    /// every violation.
    async fn submit(&self, draft: LeadDraft) -> Result<Lead, Error>;
}

/// Fixture command that validates but never stores.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeadSubmissionCommand;

#[async_trait]
impl LeadSubmissionCommand for FixtureLeadSubmissionCommand {
    async fn submit(&self, draft: LeadDraft) -> Result<Lead, Error> {
        LeadSubmission::try_new(draft)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Err(Error::service_unavailable("lead storage is not configured"))
    }
}
