/// Request and response bodies of the sign-in and refresh endpoints

use serde::{Deserialize, Serialize};

/// `{"access_token": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
}

/// `{"refresh_token": ...}`, also the body of the refresh request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub refresh_token: String,
}

/// Sign-in response carrying both tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccess {
    pub access_token: String,
    pub refresh_token: String,
}
