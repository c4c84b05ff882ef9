//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LeadClaimCommand, LeadQuery, LeadSubmissionCommand, LoginService, RegistrationCommand,
    UserProfileQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registrations: Arc<dyn RegistrationCommand>,
    pub user_profiles: Arc<dyn UserProfileQuery>,
    pub lead_claims: Arc<dyn LeadClaimCommand>,
    pub lead_submissions: Arc<dyn LeadSubmissionCommand>,
    pub lead_queries: Arc<dyn LeadQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registrations: Arc<dyn RegistrationCommand>,
    pub user_profiles: Arc<dyn UserProfileQuery>,
    pub lead_claims: Arc<dyn LeadClaimCommand>,
    pub lead_submissions: Arc<dyn LeadSubmissionCommand>,
    pub lead_queries: Arc<dyn LeadQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::AccountService;
    /// use backend::domain::ports::{
    ///     FixtureLeadClaimCommand, FixtureLeadQuery, FixtureLeadSubmissionCommand,
    /// };
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use backend::outbound::memory::InMemoryUserRepository;
    ///
    /// let accounts = Arc::new(AccountService::new(Arc::new(InMemoryUserRepository::new())));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: accounts.clone(),
    ///     registrations: accounts.clone(),
    ///     user_profiles: accounts,
    ///     lead_claims: Arc::new(FixtureLeadClaimCommand),
    ///     lead_submissions: Arc::new(FixtureLeadSubmissionCommand),
    ///     lead_queries: Arc::new(FixtureLeadQuery),
    /// });
    /// let _claims = state.lead_claims.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            registrations,
            user_profiles,
            lead_claims,
            lead_submissions,
            lead_queries,
        } = ports;
        Self {
            login,
            registrations,
            user_profiles,
            lead_claims,
            lead_submissions,
            lead_queries,
        }
    }
}
