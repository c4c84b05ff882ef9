//! Driving port for staff authentication.
//!
//! Inbound adapters call this port to turn credentials into a verified
//! [`UserId`]. Protected handlers re-check that the user still exists through
//! [`UserProfileQuery`](super::UserProfileQuery) on every request.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    ///
    /// Unknown emails and wrong passwords both fail with the same
    /// unauthorised error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}
