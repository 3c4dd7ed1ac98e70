/// Refresh backends
///
/// Mint a new access token from a refresh token. No user-store access:
/// account status is not re-checked here.

use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::TokenIssuer;
use crate::error::{AppError, AuthError};
use crate::schemas::{AccessToken, RefreshToken};

/// Refresh capability
#[async_trait]
pub trait RefreshBackend: Send + Sync + 'static {
    /// # Errors
    /// `AuthError::Authentication` if the token fails verification,
    /// `AuthError::Unauthorized` if it is not a refresh token
    async fn refresh(&self, token: RefreshToken) -> Result<AccessToken, AppError>;
}

/// Stateless refresh: verify, check the type tag, re-issue
pub struct RefreshAuthentication {
    issuer: Arc<TokenIssuer>,
}

impl RefreshAuthentication {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self {
        Self { issuer }
    }
}

#[async_trait]
impl RefreshBackend for RefreshAuthentication {
    async fn refresh(&self, token: RefreshToken) -> Result<AccessToken, AppError> {
        let claims = self
            .issuer
            .verify(&token.refresh_token)
            .map_err(|e| AuthError::Authentication(e.to_string()))?;

        self.issuer.ensure_refresh_token(&claims)?;

        let access_token = self.issuer.issue_access_token(&claims.sub)?;

        tracing::info!(sub = %claims.sub, "Access token refreshed");

        Ok(access_token)
    }
}
