//! Validation of public lead submissions.
//!
//! [`LeadSubmission::try_new`] trims every field and checks all of them before
//! reporting, so a caller sees every violation in one response.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Minimum name length in characters.
pub const NAME_MIN: usize = 2;
/// Maximum name length in characters.
pub const NAME_MAX: usize = 255;
/// Maximum email length in characters.
pub const EMAIL_MAX: usize = 255;
/// Maximum course interest length in characters.
pub const COURSE_INTEREST_MAX: usize = 255;
/// Maximum message length in characters.
pub const MESSAGE_MAX: usize = 1000;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One `@`, no whitespace, and a dotted domain with a non-empty label on
        // each side of the final dot.
        Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Trim and lower-case an email address.
pub(crate) fn normalise_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether a normalised email has a plausible `local@domain.tld` shape.
pub(crate) fn is_well_formed_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Raw submission as received from a visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadDraft {
    /// Enquirer name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Course the visitor asked about.
    pub course_interest: String,
    /// Optional free-text message.
    pub message: Option<String>,
}

/// Submission field a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LeadField {
    /// Enquirer name.
    Name,
    /// Contact email.
    Email,
    /// Course the visitor asked about.
    CourseInterest,
    /// Optional free-text message.
    Message,
}

impl LeadField {
    fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::CourseInterest => "course interest",
            Self::Message => "message",
        }
    }
}

/// Machine-readable violation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// Missing or blank after trimming.
    Required,
    /// Below the minimum length.
    TooShort,
    /// Above the maximum length.
    TooLong,
    /// Not shaped like an email address.
    InvalidFormat,
}

/// A single field failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadFieldViolation {
    field: LeadField,
    code: ViolationCode,
    message: String,
}

impl LeadFieldViolation {
    fn required(field: LeadField) -> Self {
        Self {
            field,
            code: ViolationCode::Required,
            message: format!("{} is required", field.label()),
        }
    }

    fn too_short(field: LeadField, min: usize) -> Self {
        Self {
            field,
            code: ViolationCode::TooShort,
            message: format!("{} must be at least {min} characters", field.label()),
        }
    }

    fn too_long(field: LeadField, max: usize) -> Self {
        Self {
            field,
            code: ViolationCode::TooLong,
            message: format!("{} must not exceed {max} characters", field.label()),
        }
    }

    fn invalid_email() -> Self {
        Self {
            field: LeadField::Email,
            code: ViolationCode::InvalidFormat,
            message: "email must be a valid email address".to_owned(),
        }
    }

    /// Field that failed.
    #[must_use]
    pub const fn field(&self) -> LeadField {
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

/// Every violation found in a submission, in field order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lead submission has {} invalid field(s)", .violations.len())]
pub struct LeadValidationError {
    violations: Vec<LeadFieldViolation>,
}

impl LeadValidationError {
    /// Violations in field order.
    #[must_use]
    pub fn violations(&self) -> &[LeadFieldViolation] {
        &self.violations
    }
}

/// Trimmed, length-checked submission ready for insertion.
///
/// ## Invariants
/// - `name` has `NAME_MIN..=NAME_MAX` characters.
/// - `email` is well formed, lower-cased and at most `EMAIL_MAX` characters.
/// - `course_interest` has `1..=COURSE_INTEREST_MAX` characters.
/// - `message`, when present, is non-blank with at most `MESSAGE_MAX`
///   characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadSubmission {
    name: String,
    email: String,
    course_interest: String,
    message: Option<String>,
}

impl LeadSubmission {
    /// Validate a raw draft.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{LeadDraft, LeadSubmission};
    ///
    /// let submission = LeadSubmission::try_new(LeadDraft {
    ///     name: "  Bob Learner ".into(),
    ///     email: "Bob@Learner.com".into(),
    ///     course_interest: "Python Fundamentals".into(),
    ///     message: Some("   ".into()),
    /// })
    /// .expect("valid draft");
    /// assert_eq!(submission.name(), "Bob Learner");
    /// assert_eq!(submission.email(), "bob@learner.com");
    /// assert_eq!(submission.message(), None);
    /// ```
    pub fn try_new(draft: LeadDraft) -> Result<Self, LeadValidationError> {
        let mut violations = Vec::new();

        let name = draft.name.trim();
        match name.chars().count() {
            0 => violations.push(LeadFieldViolation::required(LeadField::Name)),
            n if n < NAME_MIN => {
                violations.push(LeadFieldViolation::too_short(LeadField::Name, NAME_MIN));
            }
            n if n > NAME_MAX => {
                violations.push(LeadFieldViolation::too_long(LeadField::Name, NAME_MAX));
            }
            _ => {}
        }

        // Trim and lower-case only. Provider-specific rules such as dropping
        // dots or `+tag` suffixes are not applied.
        let email = normalise_email(&draft.email);
        if email.is_empty() {
            violations.push(LeadFieldViolation::required(LeadField::Email));
        } else if email.chars().count() > EMAIL_MAX {
            violations.push(LeadFieldViolation::too_long(LeadField::Email, EMAIL_MAX));
        } else if !is_well_formed_email(&email) {
            violations.push(LeadFieldViolation::invalid_email());
        }

        let course_interest = draft.course_interest.trim();
        match course_interest.chars().count() {
            0 => violations.push(LeadFieldViolation::required(LeadField::CourseInterest)),
            n if n > COURSE_INTEREST_MAX => violations.push(LeadFieldViolation::too_long(
                LeadField::CourseInterest,
                COURSE_INTEREST_MAX,
            )),
            _ => {}
        }

        let message = draft
            .message
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());
        if message.is_some_and(|text| text.chars().count() > MESSAGE_MAX) {
            violations.push(LeadFieldViolation::too_long(LeadField::Message, MESSAGE_MAX));
        }

        if !violations.is_empty() {
            return Err(LeadValidationError { violations });
        }

        Ok(Self {
            name: name.to_owned(),
            email,
            course_interest: course_interest.to_owned(),
            message: message.map(str::to_owned),
        })
    }

    /// Trimmed name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed, lower-cased email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Trimmed course interest.
    pub fn course_interest(&self) -> &str {
        &self.course_interest
    }

    /// Trimmed message; blank input is stored as `None`.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
