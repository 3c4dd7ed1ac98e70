use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::auth::PasswordHasher;
use crate::configuration::SeedUser;
use crate::error::{AppError, StoreError};
use crate::store::{User, UserLookup, UserStore};

/// Users kept in a map keyed by id
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from configured accounts, hashing their passwords
    pub fn from_seed(seed: &[SeedUser], hasher: &dyn PasswordHasher) -> Result<Self, AppError> {
        let store = Self::new();
        for account in seed {
            store.insert(User {
                id: account.id.clone(),
                email: account.email.clone(),
                username: account.username.clone(),
                password_hash: hasher.hash(&account.password)?,
                is_active: account.is_active,
            })?;
        }
        Ok(store)
    }

    /// Insert or replace a user by id
    pub fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| StoreError::Unexpected("user map lock poisoned".to_string()))?;
        users.insert(user.id.clone(), user);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.users.read().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_user(&self, lookup: &UserLookup) -> Result<Option<User>, StoreError> {
        let users = self
            .users
            .read()
            .map_err(|_| StoreError::Unexpected("user map lock poisoned".to_string()))?;

        let found = users.values().find(|user| match lookup {
            UserLookup::Email(email) => user.email.as_deref() == Some(email.as_str()),
            UserLookup::Username(username) => user.username.as_deref() == Some(username.as_str()),
        });

        Ok(found.cloned())
    }
}
