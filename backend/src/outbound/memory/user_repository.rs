//! In-process `UserRepository` used when no database is configured.
//!
//! Accounts live for the lifetime of the process, keyed by id with the
//! email uniqueness checked under the same write lock as the insert.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserAccount, UserId};

/// Thread-safe in-memory account store.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    accounts: Arc<RwLock<HashMap<UserId, UserAccount>>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = self.accounts.write().await;
        let email = account.user().email();
        if accounts
            .values()
            .any(|existing| existing.user().email() == email)
        {
            return Err(UserPersistenceError::duplicate_email());
        }
        if accounts.contains_key(account.user().id()) {
            return Err(UserPersistenceError::query("user id already exists"));
        }
        accounts.insert(account.user().id().clone(), account.clone());
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|account| account.user().email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(id).map(|account| account.user().clone()))
    }
}
