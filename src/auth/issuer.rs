/// Token issuance and token type discipline
///
/// `TokenIssuer` resolves key material and lifetimes from `JwtSettings`
/// once at startup and is shared read-only afterwards. Every token it
/// issues is tagged with a `token_type` claim.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use serde_json::Map;

use crate::auth::claims::Claims;
use crate::auth::clock::{Clock, SystemClock};
use crate::auth::codec;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError, ConfigError, VerificationError};
use crate::schemas::{AccessToken, RefreshToken, TokenAccess};

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_token_lifetime: Duration,
    refresh_token_lifetime: Duration,
    access_token_name: String,
    refresh_token_name: String,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Build an issuer from configuration, using the system clock
    ///
    /// # Errors
    /// Returns error if the key material does not fit the algorithm,
    /// a lifetime is not positive, or a token type name is empty
    pub fn from_settings(settings: &JwtSettings) -> Result<Self, ConfigError> {
        let access_token_lifetime =
            lifetime("access_token_lifetime", settings.access_token_lifetime)?;
        let refresh_token_lifetime =
            lifetime("refresh_token_lifetime", settings.refresh_token_lifetime)?;

        if settings.access_token_name.is_empty() || settings.refresh_token_name.is_empty() {
            return Err(ConfigError::InvalidValue(
                "token type names must not be empty".to_string(),
            ));
        }
        if settings.access_token_name == settings.refresh_token_name {
            return Err(ConfigError::InvalidValue(
                "access_token_name and refresh_token_name must differ".to_string(),
            ));
        }

        let (encoding_key, decoding_key) = resolve_keys(settings)?;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm: settings.algorithm,
            access_token_lifetime,
            refresh_token_lifetime,
            access_token_name: settings.access_token_name.clone(),
            refresh_token_name: settings.refresh_token_name.clone(),
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn access_token_name(&self) -> &str {
        &self.access_token_name
    }

    pub fn refresh_token_name(&self) -> &str {
        &self.refresh_token_name
    }

    /// Sign a token for `sub` tagged with `token_type`
    ///
    /// Extra claims named `sub`, `exp` or `token_type` are ignored.
    pub fn issue(
        &self,
        sub: &str,
        token_type: &str,
        expires_at: DateTime<Utc>,
        extra: Map<String, serde_json::Value>,
    ) -> Result<String, AppError> {
        let claims = Claims::new(sub, expires_at)
            .with_token_type(token_type)
            .with_extra(extra);

        codec::encode(&claims, &self.encoding_key, self.algorithm)
    }

    pub fn issue_access_token(&self, sub: &str) -> Result<AccessToken, AppError> {
        let expires_at = expiry(self.now(), self.access_token_lifetime)?;
        let access_token = self.issue(sub, &self.access_token_name, expires_at, Map::new())?;
        Ok(AccessToken { access_token })
    }

    pub fn issue_refresh_token(&self, sub: &str) -> Result<RefreshToken, AppError> {
        let expires_at = expiry(self.now(), self.refresh_token_lifetime)?;
        let refresh_token = self.issue(sub, &self.refresh_token_name, expires_at, Map::new())?;
        Ok(RefreshToken { refresh_token })
    }

    /// Access and refresh token for the same principal, both timed from one instant
    pub fn issue_pair(&self, sub: &str) -> Result<TokenAccess, AppError> {
        let now = self.now();
        let access_token = self.issue(
            sub,
            &self.access_token_name,
            expiry(now, self.access_token_lifetime)?,
            Map::new(),
        )?;
        let refresh_token = self.issue(
            sub,
            &self.refresh_token_name,
            expiry(now, self.refresh_token_lifetime)?,
            Map::new(),
        )?;

        Ok(TokenAccess {
            access_token,
            refresh_token,
        })
    }

    /// Decode and verify a token with the configured key and algorithm
    pub fn verify(&self, token: &str) -> Result<Claims, VerificationError> {
        codec::decode_at(token, &self.decoding_key, &[self.algorithm], self.now())
    }

    pub fn ensure_refresh_token(&self, claims: &Claims) -> Result<(), AuthError> {
        ensure_token_type(claims, &self.refresh_token_name, "Only refresh tokens are allowed")
    }

    pub fn ensure_access_token(&self, claims: &Claims) -> Result<(), AuthError> {
        ensure_token_type(claims, &self.access_token_name, "Only access tokens are allowed")
    }
}

/// Reject a cryptographically valid token whose `token_type` is not `expected`
pub fn ensure_token_type(claims: &Claims, expected: &str, detail: &str) -> Result<(), AuthError> {
    if claims.has_token_type(expected) {
        Ok(())
    } else {
        tracing::warn!(
            sub = %claims.sub,
            token_type = ?claims.token_type,
            expected = expected,
            "Token type mismatch"
        );
        Err(AuthError::Unauthorized(detail.to_string()))
    }
}

/// Positive lifetime in seconds that chrono can represent
fn lifetime(field: &str, seconds: i64) -> Result<Duration, ConfigError> {
    if seconds <= 0 {
        return Err(ConfigError::InvalidValue(format!("{} must be positive", field)));
    }
    Duration::try_seconds(seconds)
        .ok_or_else(|| ConfigError::InvalidValue(format!("{} is out of range", field)))
}

fn expiry(now: DateTime<Utc>, lifetime: Duration) -> Result<DateTime<Utc>, AppError> {
    now.checked_add_signed(lifetime)
        .ok_or_else(|| AppError::Internal("Token expiry is out of range".to_string()))
}

fn resolve_keys(settings: &JwtSettings) -> Result<(EncodingKey, DecodingKey), ConfigError> {
    if settings.signing_key.is_empty() {
        return Err(ConfigError::MissingRequired("signing_key".to_string()));
    }

    let private = settings.signing_key.as_bytes();

    match settings.algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok((
            EncodingKey::from_secret(private),
            DecodingKey::from_secret(private),
        )),
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => {
            let public = verifying_key(settings)?;
            Ok((
                EncodingKey::from_rsa_pem(private).map_err(invalid_key("signing_key"))?,
                DecodingKey::from_rsa_pem(public).map_err(invalid_key("verifying_key"))?,
            ))
        }
        Algorithm::ES256 | Algorithm::ES384 => {
            let public = verifying_key(settings)?;
            Ok((
                EncodingKey::from_ec_pem(private).map_err(invalid_key("signing_key"))?,
                DecodingKey::from_ec_pem(public).map_err(invalid_key("verifying_key"))?,
            ))
        }
        Algorithm::EdDSA => {
            let public = verifying_key(settings)?;
            Ok((
                EncodingKey::from_ed_pem(private).map_err(invalid_key("signing_key"))?,
                DecodingKey::from_ed_pem(public).map_err(invalid_key("verifying_key"))?,
            ))
        }
    }
}

fn verifying_key(settings: &JwtSettings) -> Result<&[u8], ConfigError> {
    settings
        .verifying_key
        .as_deref()
        .map(str::as_bytes)
        .ok_or_else(|| {
            ConfigError::MissingRequired(format!(
                "verifying_key is required for {:?}",
                settings.algorithm
            ))
        })
}

fn invalid_key(field: &'static str) -> impl Fn(jsonwebtoken::errors::Error) -> ConfigError {
    move |e| ConfigError::ParseError(format!("{}: {}", field, e))
}
