//! Driving port for user profile queries.
//!
//! Inbound adapters use this port to resolve a session subject into a stored
//! user without importing persistence details.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading the current user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the stored profile, or a not-found error when the row is gone.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;
}
