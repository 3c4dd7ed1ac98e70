/// User-store collaborator
///
/// The authentication backend only needs to find a principal by its
/// identity field. Persistence is the host's concern; an in-memory
/// implementation is provided for the demo binary and tests.

mod in_memory;

use async_trait::async_trait;

use crate::error::StoreError;

pub use in_memory::InMemoryUserStore;

/// A principal as seen by the authentication backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub password_hash: String,
    /// `None` when the store has no notion of deactivation
    pub is_active: Option<bool>,
}

/// Identity field a credential payload looks a principal up by
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    Email(String),
    Username(String),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `Ok(None)` when no principal matches; `Err` only for store failures
    async fn find_user(&self, lookup: &UserLookup) -> Result<Option<User>, StoreError>;
}
