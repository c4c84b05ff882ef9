//! Claim protocol service.
//!
//! Each call opens one storage transaction and walks it through:
//!
//! 1. lock the row with `get_for_update`;
//! 2. report `NotFound` or `AlreadyClaimed` from the locked snapshot;
//! 3. apply `update_if_unclaimed`, which only writes while `claimed_by` is
//!    still empty;
//! 4. commit on success, otherwise roll back.
//!
//! The row lock serialises racing claims on one lead and the conditional
//! write refuses a second owner even without it. Faults roll back before the
//! error is returned, so a failed claim never leaves a partial write.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    ClaimOutcome, ConditionalUpdate, LeadClaimCommand, LeadClaimTransaction, LeadRepository,
    LeadRepositoryError,
};
use crate::domain::{Error, LeadId, UserId};

use super::lead_service_support::map_lead_repository_error;

/// What to do with the transaction once the protocol steps have run.
enum Resolution {
    Commit(ClaimOutcome),
    Rollback(ClaimOutcome),
}

/// Service implementing [`LeadClaimCommand`] over a [`LeadRepository`].
#[derive(Clone)]
pub struct LeadClaimService<R> {
    lead_repo: Arc<R>,
}

impl<R> LeadClaimService<R> {
    /// Create a new claim service with the lead repository.
    pub fn new(lead_repo: Arc<R>) -> Self {
        Self { lead_repo }
    }
}

async fn run_steps(
    tx: &mut Box<dyn LeadClaimTransaction>,
    id: LeadId,
    user: &UserId,
) -> Result<Resolution, LeadRepositoryError> {
    let Some(current) = tx.get_for_update(id).await? else {
        return Ok(Resolution::Rollback(ClaimOutcome::NotFound));
    };
    if current.claimed_by().is_some() {
        return Ok(Resolution::Rollback(ClaimOutcome::AlreadyClaimed {
            current: Some(current),
        }));
    }

    match tx.update_if_unclaimed(id, user).await? {
        ConditionalUpdate::Applied(lead) => Ok(Resolution::Commit(ClaimOutcome::Claimed(lead))),
        ConditionalUpdate::NoRowsAffected => {
            warn!(lead_id = %id, user_id = %user, "conditional claim write matched no row under lock");
            Ok(Resolution::Rollback(ClaimOutcome::AlreadyClaimed { current: None }))
        }
    }
}

async fn rollback_logged(tx: Box<dyn LeadClaimTransaction>, id: LeadId) {
    if let Err(error) = tx.rollback().await {
        warn!(lead_id = %id, %error, "claim transaction rollback failed");
    }
}

#[async_trait]
impl<R> LeadClaimCommand for LeadClaimService<R>
where
    R: LeadRepository,
{
    async fn claim(&self, id: LeadId, user: &UserId) -> Result<ClaimOutcome, Error> {
        let mut tx = self
            .lead_repo
            .begin_claim()
            .await
            .map_err(map_lead_repository_error)?;

        match run_steps(&mut tx, id, user).await {
            Ok(Resolution::Commit(outcome)) => {
                tx.commit().await.map_err(map_lead_repository_error)?;
                info!(lead_id = %id, user_id = %user, "lead claimed");
                Ok(outcome)
            }
            Ok(Resolution::Rollback(outcome)) => {
                rollback_logged(tx, id).await;
                debug!(
                    lead_id = %id,
                    user_id = %user,
                    not_found = matches!(outcome, ClaimOutcome::NotFound),
                    "lead claim refused"
                );
                Ok(outcome)
            }
            Err(error) => {
                rollback_logged(tx, id).await;
                Err(map_lead_repository_error(error))
            }
        }
    }
}

#[cfg(test)]
#[path = "lead_claim_service_tests.rs"]
mod tests;
