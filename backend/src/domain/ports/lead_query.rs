//! Driving port for lead listings.
//!
//! Listings are read-only and may observe a claim either before or after it
//! commits, never half-way.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, Lead, UserId};

/// Domain use-case port for paged lead reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadQuery: Send + Sync {
    /// Unclaimed leads, newest first.
    async fn list_unclaimed(&self, page: PageRequest) -> Result<Page<Lead>, Error>;

    /// Leads claimed by `user`, newest first.
    async fn list_mine(&self, user: &UserId, page: PageRequest) -> Result<Page<Lead>, Error>;
}

/// Fixture query returning empty pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeadQuery;

#[async_trait]
impl LeadQuery for FixtureLeadQuery {
    async fn list_unclaimed(&self, page: PageRequest) -> Result<Page<Lead>, Error> {
        Ok(Page::new(Vec::new(), 0, page))
    }

    async fn list_mine(&self, _user: &UserId, page: PageRequest) -> Result<Page<Lead>, Error> {
        Ok(Page::new(Vec::new(), 0, page))
    }
}
