//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services implementing the driving ports.
//! Keep types immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Lead (alias to `lead::Lead`): enquiry aggregate and its claim state.
//! - LeadSubmission (alias to `lead_submission::LeadSubmission`): validated
//!   public submission.
//! - User (alias to `user::User`): staff identity referenced by claims.
//! - PasswordDigest (alias to `password::PasswordDigest`): Argon2id hash.
//! - LeadClaimService, LeadQueryService, LeadSubmissionService: driving port
//!   implementations over the `LeadRepository` port.
//! - AccountService: registration, login and profile ports over the
//!   `UserRepository` port.

pub mod account;
mod account_service;
pub mod auth;
pub mod demo_leads;
pub mod error;
pub mod lead;
mod lead_claim_service;
mod lead_query_service;
mod lead_service_support;
pub mod lead_submission;
mod lead_submission_service;
pub mod password;
pub mod ports;
pub mod staff;
pub mod trace_id;
pub mod user;

pub use self::account::{
    PASSWORD_MIN, Registration, RegistrationDraft, RegistrationField, RegistrationValidationError,
    RegistrationViolation, UserAccount,
};
pub use self::account_service::AccountService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::demo_leads::{DEMO_LEADS, demo_lead_drafts, seed_demo_leads};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::lead::{Lead, LeadId, LeadIdError, LeadIntegrityError, LeadRecord};
pub use self::lead_claim_service::LeadClaimService;
pub use self::lead_query_service::LeadQueryService;
pub use self::lead_submission::{
    LeadDraft, LeadField, LeadFieldViolation, LeadSubmission, LeadValidationError, ViolationCode,
};
pub use self::lead_submission_service::LeadSubmissionService;
pub use self::password::{PasswordDigest, PasswordDigestError};
pub use self::staff::{STAFF_ACCOUNTS, StaffAccount, seed_staff_accounts};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{DisplayName, EmailAddress, User, UserId, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
