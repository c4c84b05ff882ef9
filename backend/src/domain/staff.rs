//! Demo staff accounts for local development.
//!
//! The accounts are registered through the normal registration path, so their
//! passwords are stored hashed like any other. Nothing authenticates against
//! this table directly.

use tracing::info;
use zeroize::Zeroizing;

use super::ports::RegistrationCommand;
use super::{Error, ErrorCode, RegistrationDraft};

/// A demo staff account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffAccount {
    name: &'static str,
    email: &'static str,
    password: &'static str,
}

/// Demo staff accounts.
pub const STAFF_ACCOUNTS: &[StaffAccount] = &[
    StaffAccount {
        name: "John Counselor",
        email: "john@example.com",
        password: "password123",
    },
    StaffAccount {
        name: "Jane Advisor",
        email: "jane@example.com",
        password: "password123",
    },
];

impl StaffAccount {
    /// Login email.
    pub fn email(&self) -> &'static str {
        self.email
    }

    /// Demo password.
    pub fn password(&self) -> &'static str {
        self.password
    }

    /// Registration payload for this account.
    pub fn draft(&self) -> RegistrationDraft {
        RegistrationDraft {
            name: self.name.to_owned(),
            email: self.email.to_owned(),
            password: Zeroizing::new(self.password.to_owned()),
        }
    }
}

/// Register every demo staff account that does not exist yet.
///
/// Returns how many accounts were created.
pub async fn seed_staff_accounts(registrations: &dyn RegistrationCommand) -> Result<usize, Error> {
    let mut created = 0;
    for account in STAFF_ACCOUNTS {
        match registrations.register(account.draft()).await {
            Ok(_) => created += 1,
            Err(err) if err.code() == ErrorCode::Conflict => {}
            Err(err) => return Err(err),
        }
    }
    info!(count = created, "demo staff accounts seeded");
    Ok(created)
}
