//! Driving port for staff self-registration.

use async_trait::async_trait;

use crate::domain::{Error, RegistrationDraft, User};

/// Domain use-case port for creating staff accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Validate the draft, hash its password and store the account.
    ///
    /// A taken email fails with a conflict; validation failures carry the
    /// field violations in `details`.
    async fn register(&self, draft: RegistrationDraft) -> Result<User, Error>;
}
