//! Staff account service: registration, login and profile lookup.
//!
//! Argon2 work runs on the blocking pool so request workers stay responsive
//! while a digest is computed.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::task::{JoinError, spawn_blocking};
use tracing::{debug, info};

use crate::domain::ports::{
    LoginService, RegistrationCommand, UserPersistenceError, UserProfileQuery, UserRepository,
};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, PasswordDigest, Registration, RegistrationDraft,
    RegistrationValidationError, User, UserAccount, UserId,
};

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

fn map_validation_error(error: &RegistrationValidationError) -> Error {
    Error::invalid_request("registration failed validation")
        .with_details(json!({ "violations": error.violations() }))
}

fn map_join_error(error: JoinError) -> Error {
    Error::internal(format!("password worker failed: {error}"))
}

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    debug!(kind = error.kind(), %error, "user storage fault");
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail => Error::conflict("Email already registered"),
    }
}

/// Service implementing the account ports over a [`UserRepository`].
#[derive(Clone)]
pub struct AccountService<R> {
    users: Arc<R>,
}

impl<R> AccountService<R> {
    /// Create a new account service with the user repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R> RegistrationCommand for AccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, draft: RegistrationDraft) -> Result<User, Error> {
        let registration =
            Registration::try_new(draft).map_err(|err| map_validation_error(&err))?;
        let (display_name, email, password) = registration.into_parts();

        let digest = spawn_blocking(move || PasswordDigest::hash(&password))
            .await
            .map_err(map_join_error)?
            .map_err(|err| Error::internal(err.to_string()))?;

        let account = UserAccount::new(User::new(UserId::random(), display_name, email), digest);
        self.users
            .create(&account)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %account.user().id(), "staff account registered");
        Ok(account.into_user())
    }
}

#[async_trait]
impl<R> LoginService for AccountService<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(invalid_credentials());
        };
        let Some(account) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_persistence_error)?
        else {
            return Err(invalid_credentials());
        };

        let digest = account.password_digest().clone();
        let attempt = credentials.clone();
        let verified = spawn_blocking(move || digest.verify(attempt.password()))
            .await
            .map_err(map_join_error)?;
        if !verified {
            return Err(invalid_credentials());
        }
        Ok(account.user().id().clone())
    }
}

#[async_trait]
impl<R> UserProfileQuery for AccountService<R>
where
    R: UserRepository,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
