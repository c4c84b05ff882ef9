//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod lead_claim_command;
mod lead_query;
mod lead_repository;
mod lead_submission_command;
mod login_service;
mod registration_command;
mod user_profile_query;
mod user_repository;

#[cfg(test)]
pub use lead_claim_command::MockLeadClaimCommand;
pub use lead_claim_command::{ClaimOutcome, FixtureLeadClaimCommand, LeadClaimCommand};
#[cfg(test)]
pub use lead_query::MockLeadQuery;
pub use lead_query::{FixtureLeadQuery, LeadQuery};
#[cfg(test)]
pub use lead_repository::MockLeadRepository;
pub use lead_repository::{
    ConditionalUpdate, LeadClaimTransaction, LeadRepository, LeadRepositoryError,
};
#[cfg(test)]
pub use lead_submission_command::MockLeadSubmissionCommand;
pub use lead_submission_command::{FixtureLeadSubmissionCommand, LeadSubmissionCommand};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::RegistrationCommand;
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
