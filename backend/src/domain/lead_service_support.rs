//! Shared helpers for the lead services.

use tracing::debug;

use crate::domain::Error;
use crate::domain::ports::LeadRepositoryError;

/// Translate a storage fault into the domain error surfaced to callers.
pub(crate) fn map_lead_repository_error(error: LeadRepositoryError) -> Error {
    debug!(kind = error.kind(), %error, "lead storage fault");
    match error {
        LeadRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("lead repository unavailable: {message}"))
        }
        LeadRepositoryError::Query { message } => {
            Error::internal(format!("lead repository error: {message}"))
        }
        LeadRepositoryError::UnknownClaimant { .. } => {
            Error::invalid_request("Referenced resource does not exist")
        }
    }
}
