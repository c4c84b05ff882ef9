//! Builders wiring storage adapters into HTTP state ports.

use std::sync::Arc;

use tracing::info;

use backend::domain::AccountService;
use backend::domain::ports::{
    LeadClaimCommand, LeadQuery, LeadRepository, LeadSubmissionCommand, LoginService,
    RegistrationCommand, UserProfileQuery, UserRepository,
};
use backend::domain::{LeadClaimService, LeadQueryService, LeadSubmissionService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::memory::{InMemoryLeadRepository, InMemoryUserRepository};
use backend::outbound::persistence::{DbPool, DieselLeadRepository, DieselUserRepository};

use super::ServerConfig;

/// Account ports, all backed by one account service.
struct AccountPorts {
    login: Arc<dyn LoginService>,
    registrations: Arc<dyn RegistrationCommand>,
    user_profiles: Arc<dyn UserProfileQuery>,
}

fn account_ports<R>(users: Arc<R>) -> AccountPorts
where
    R: UserRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(users));
    AccountPorts {
        login: accounts.clone(),
        registrations: accounts.clone(),
        user_profiles: accounts,
    }
}

/// Driving ports for the lead desk, all sharing one repository.
struct LeadPorts {
    claims: Arc<dyn LeadClaimCommand>,
    submissions: Arc<dyn LeadSubmissionCommand>,
    queries: Arc<dyn LeadQuery>,
}

fn lead_ports<R>(repo: Arc<R>) -> LeadPorts
where
    R: LeadRepository + 'static,
{
    LeadPorts {
        claims: Arc::new(LeadClaimService::new(Arc::clone(&repo))),
        submissions: Arc::new(LeadSubmissionService::new(Arc::clone(&repo))),
        queries: Arc::new(LeadQueryService::new(repo)),
    }
}

fn database_ports(pool: &DbPool) -> (AccountPorts, LeadPorts) {
    (
        account_ports(Arc::new(DieselUserRepository::new(pool.clone()))),
        lead_ports(Arc::new(DieselLeadRepository::new(pool.clone()))),
    )
}

fn in_memory_ports() -> (AccountPorts, LeadPorts) {
    (
        account_ports(Arc::new(InMemoryUserRepository::new())),
        lead_ports(Arc::new(InMemoryLeadRepository::new())),
    )
}

/// Build HTTP state from the server configuration.
///
/// A configured pool selects the PostgreSQL adapters; without one, accounts
/// and leads live in process memory and vanish on restart.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let (accounts, leads) = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL account and lead stores");
            database_ports(pool)
        }
        None => {
            info!("no database configured; using in-memory stores");
            in_memory_ports()
        }
    };
    HttpState::new(HttpStatePorts {
        login: accounts.login,
        registrations: accounts.registrations,
        user_profiles: accounts.user_profiles,
        lead_claims: leads.claims,
        lead_submissions: leads.submissions,
        lead_queries: leads.queries,
    })
}
