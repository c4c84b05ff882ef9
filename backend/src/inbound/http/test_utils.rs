//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use zeroize::Zeroizing;

use crate::domain::ports::{
    FixtureLeadClaimCommand, FixtureLeadQuery, FixtureLeadSubmissionCommand,
};
use crate::domain::{AccountService, RegistrationDraft, User};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryUserRepository;

/// Email of the account created by [`register_test_staff`].
pub const TEST_STAFF_EMAIL: &str = "john@example.com";
/// Password of the account created by [`register_test_staff`].
pub const TEST_STAFF_PASSWORD: &str = "password123";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// State with fixture lead ports and account ports over an empty in-memory
/// store.
pub fn fixture_state() -> HttpState {
    let accounts = Arc::new(AccountService::new(Arc::new(InMemoryUserRepository::new())));
    HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        registrations: accounts.clone(),
        user_profiles: accounts,
        lead_claims: Arc::new(FixtureLeadClaimCommand),
        lead_submissions: Arc::new(FixtureLeadSubmissionCommand),
        lead_queries: Arc::new(FixtureLeadQuery),
    })
}

/// Register the standard test staff account through `state`.
pub async fn register_test_staff(state: &HttpState) -> User {
    state
        .registrations
        .register(RegistrationDraft {
            name: "John Counselor".to_owned(),
            email: TEST_STAFF_EMAIL.to_owned(),
            password: Zeroizing::new(TEST_STAFF_PASSWORD.to_owned()),
        })
        .await
        .expect("test staff registration")
}
