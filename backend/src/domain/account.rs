//! Staff self-registration and stored login accounts.
//!
//! [`Registration::try_new`] checks every field before reporting, mirroring
//! lead submissions, so the client sees all violations at once. The password
//! is never trimmed and never leaves this module in plaintext except to the
//! hasher.

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::lead_submission::{EMAIL_MAX, NAME_MAX, NAME_MIN, ViolationCode};
use super::{DisplayName, EmailAddress, PasswordDigest, User};

/// Minimum password length in characters.
pub const PASSWORD_MIN: usize = 6;

/// Raw registration payload.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    /// Staff member name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password; zeroed on drop.
    pub password: Zeroizing<String>,
}

impl fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDraft")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Registration field a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RegistrationField {
    /// Staff member name.
    Name,
    /// Login email.
    Email,
    /// Password.
    Password,
}

impl RegistrationField {
    fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

/// A single registration field failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationViolation {
    field: RegistrationField,
    code: ViolationCode,
    message: String,
}

impl RegistrationViolation {
    fn new(field: RegistrationField, code: ViolationCode, message: String) -> Self {
        Self {
            field,
            code,
            message,
        }
    }

    fn required(field: RegistrationField) -> Self {
        Self::new(
            field,
            ViolationCode::Required,
            format!("{} is required", field.label()),
        )
    }

    fn too_short(field: RegistrationField, min: usize) -> Self {
        Self::new(
            field,
            ViolationCode::TooShort,
            format!("{} must be at least {min} characters", field.label()),
        )
    }

    fn too_long(field: RegistrationField, max: usize) -> Self {
        Self::new(
            field,
            ViolationCode::TooLong,
            format!("{} must not exceed {max} characters", field.label()),
        )
    }

    /// Field that failed.
    #[must_use]
    pub const fn field(&self) -> RegistrationField {
        self.field
    }

    /// Failure category.
    #[must_use]
    pub const fn code(&self) -> ViolationCode {
        self.code
    }

    /// Human readable explanation.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Every violation found in a registration, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("registration has {} invalid field(s)", .violations.len())]
pub struct RegistrationValidationError {
    violations: Vec<RegistrationViolation>,
}

impl RegistrationValidationError {
    /// Violations in field order.
    #[must_use]
    pub fn violations(&self) -> &[RegistrationViolation] {
        &self.violations
    }
}

/// Validated registration awaiting a password hash.
///
/// ## Invariants
/// - `display_name` has `NAME_MIN..=NAME_MAX` characters.
/// - `email` is normalised and well formed.
/// - `password` has at least `PASSWORD_MIN` characters.
#[cfg_attr(test, derive(Debug))]
pub struct Registration {
    display_name: DisplayName,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate a raw draft.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Registration, RegistrationDraft};
    ///
    /// let registration = Registration::try_new(RegistrationDraft {
    ///     name: " Jane Advisor ".into(),
    ///     email: "Jane@Example.com".into(),
    ///     password: "password123".to_owned().into(),
    /// })
    /// .expect("valid draft");
    /// assert_eq!(registration.email().as_ref(), "jane@example.com");
    /// ```
    pub fn try_new(draft: RegistrationDraft) -> Result<Self, RegistrationValidationError> {
        let mut violations = Vec::new();

        let name = draft.name.trim();
        let name_len = name.chars().count();
        if name_len == 0 {
            violations.push(RegistrationViolation::required(RegistrationField::Name));
        } else if name_len < NAME_MIN {
            violations.push(RegistrationViolation::too_short(
                RegistrationField::Name,
                NAME_MIN,
            ));
        } else if name_len > NAME_MAX {
            violations.push(RegistrationViolation::too_long(
                RegistrationField::Name,
                NAME_MAX,
            ));
        }
        let display_name = DisplayName::new(name).ok();

        let email = if draft.email.trim().is_empty() {
            violations.push(RegistrationViolation::required(RegistrationField::Email));
            None
        } else {
            let parsed = EmailAddress::new(&draft.email).ok();
            if parsed.is_none() {
                violations.push(RegistrationViolation::new(
                    RegistrationField::Email,
                    ViolationCode::InvalidFormat,
                    format!("email must be a valid email address of at most {EMAIL_MAX} characters"),
                ));
            }
            parsed
        };

        let password_len = draft.password.chars().count();
        if password_len == 0 {
            violations.push(RegistrationViolation::required(RegistrationField::Password));
        } else if password_len < PASSWORD_MIN {
            violations.push(RegistrationViolation::too_short(
                RegistrationField::Password,
                PASSWORD_MIN,
            ));
        }

        match (display_name, email) {
            (Some(display_name), Some(email)) if violations.is_empty() => Ok(Self {
                display_name,
                email,
                password: draft.password,
            }),
            _ => Err(RegistrationValidationError { violations }),
        }
    }

    /// Trimmed display name.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Normalised login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Split into the profile fields and the plaintext password.
    pub fn into_parts(self) -> (DisplayName, EmailAddress, Zeroizing<String>) {
        (self.display_name, self.email, self.password)
    }
}

/// A stored user together with their password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    user: User,
    password_digest: PasswordDigest,
}

impl UserAccount {
    /// Pair a user with their digest.
    pub fn new(user: User, password_digest: PasswordDigest) -> Self {
        Self {
            user,
            password_digest,
        }
    }

    /// Public profile.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Stored password digest.
    pub fn password_digest(&self) -> &PasswordDigest {
        &self.password_digest
    }

    /// Drop the digest and keep the profile.
    pub fn into_user(self) -> User {
        self.user
    }
}
