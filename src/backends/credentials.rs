/// Sign-in payloads
///
/// Each payload checks its own field shape before any backend logic
/// runs; a failure there is answered with 422.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::store::UserLookup;
use crate::validators::{is_valid_email, is_valid_password, is_valid_username};

/// Body accepted by the sign-in endpoint
pub trait LoginPayload: DeserializeOwned + Send + 'static {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A payload made of an identity field and a password
pub trait PasswordCredentials: LoginPayload {
    fn lookup(&self) -> UserLookup;
    fn password(&self) -> &str;
}

/// `{"email": ..., "password": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginEmailIn {
    pub email: String,
    pub password: String,
}

impl LoginPayload for LoginEmailIn {
    fn validate(&self) -> Result<(), ValidationError> {
        is_valid_email(&self.email)?;
        is_valid_password(&self.password)
    }
}

impl PasswordCredentials for LoginEmailIn {
    fn lookup(&self) -> UserLookup {
        UserLookup::Email(self.email.trim().to_string())
    }

    fn password(&self) -> &str {
        &self.password
    }
}

/// `{"username": ..., "password": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginUserIn {
    pub username: String,
    pub password: String,
}

impl LoginPayload for LoginUserIn {
    fn validate(&self) -> Result<(), ValidationError> {
        is_valid_username(&self.username)?;
        is_valid_password(&self.password)
    }
}

impl PasswordCredentials for LoginUserIn {
    fn lookup(&self) -> UserLookup {
        UserLookup::Username(self.username.trim().to_string())
    }

    fn password(&self) -> &str {
        &self.password
    }
}
