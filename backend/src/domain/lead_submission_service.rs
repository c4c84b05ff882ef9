//! Public lead submission service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{LeadRepository, LeadSubmissionCommand};
use crate::domain::{Error, Lead, LeadDraft, LeadSubmission, LeadValidationError};

use super::lead_service_support::map_lead_repository_error;

fn map_validation_error(error: &LeadValidationError) -> Error {
    Error::invalid_request("lead submission failed validation")
        .with_details(json!({ "violations": error.violations() }))
}

/// Service implementing [`LeadSubmissionCommand`] over a [`LeadRepository`].
#[derive(Clone)]
pub struct LeadSubmissionService<R> {
    lead_repo: Arc<R>,
}

impl<R> LeadSubmissionService<R> {
    /// Create a new submission service with the lead repository.
    pub fn new(lead_repo: Arc<R>) -> Self {
        Self { lead_repo }
    }
}

#[async_trait]
impl<R> LeadSubmissionCommand for LeadSubmissionService<R>
where
    R: LeadRepository,
{
    async fn submit(&self, draft: LeadDraft) -> Result<Lead, Error> {
        let submission = LeadSubmission::try_new(draft).map_err(|err| map_validation_error(&err))?;
        let lead = self
            .lead_repo
            .insert(&submission)
            .await
            .map_err(map_lead_repository_error)?;
        info!(lead_id = %lead.id(), "lead submitted");
        Ok(lead)
    }
}

#[cfg(test)]
#[path = "lead_submission_service_tests.rs"]
mod tests;
