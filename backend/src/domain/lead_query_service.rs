//! Paged lead listings.
//!
//! Each listing runs the page read and the count as two independent
//! statements without a shared snapshot, so `total` may lag a claim that
//! commits between them.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{LeadQuery, LeadRepository};
use crate::domain::{Error, Lead, UserId};

use super::lead_service_support::map_lead_repository_error;

/// Service implementing [`LeadQuery`] over a [`LeadRepository`].
#[derive(Clone)]
pub struct LeadQueryService<R> {
    lead_repo: Arc<R>,
}

impl<R> LeadQueryService<R> {
    /// Create a new query service with the lead repository.
    pub fn new(lead_repo: Arc<R>) -> Self {
        Self { lead_repo }
    }
}

#[async_trait]
impl<R> LeadQuery for LeadQueryService<R>
where
    R: LeadRepository,
{
    async fn list_unclaimed(&self, page: PageRequest) -> Result<Page<Lead>, Error> {
        let leads = self
            .lead_repo
            .list_unclaimed(page)
            .await
            .map_err(map_lead_repository_error)?;
        let total = self
            .lead_repo
            .count_unclaimed()
            .await
            .map_err(map_lead_repository_error)?;
        Ok(Page::new(leads, total, page))
    }

    async fn list_mine(&self, user: &UserId, page: PageRequest) -> Result<Page<Lead>, Error> {
        let leads = self
            .lead_repo
            .list_claimed_by(user, page)
            .await
            .map_err(map_lead_repository_error)?;
        let total = self
            .lead_repo
            .count_claimed_by(user)
            .await
            .map_err(map_lead_repository_error)?;
        Ok(Page::new(leads, total, page))
    }
}

#[cfg(test)]
#[path = "lead_query_service_tests.rs"]
mod tests;
