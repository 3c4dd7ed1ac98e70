/// Token encoding and decoding
///
/// Thin layer over `jsonwebtoken`. Expiry is checked here rather than by
/// the library so the caller can decide what "now" is.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::error::{AppError, VerificationError};

/// Encode claims into a signed compact token
///
/// # Errors
/// Returns error if the key does not fit the algorithm or signing fails
pub fn encode(claims: &Claims, key: &EncodingKey, algorithm: Algorithm) -> Result<String, AppError> {
    jsonwebtoken::encode(&Header::new(algorithm), claims, key)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Decode and verify a token against the current system time
pub fn decode(
    token: &str,
    key: &DecodingKey,
    algorithms: &[Algorithm],
) -> Result<Claims, VerificationError> {
    decode_at(token, key, algorithms, Utc::now())
}

/// Decode and verify a token, treating it as expired when `now >= exp`
///
/// # Errors
/// Returns error if the token is malformed, signed with a disallowed
/// algorithm, tampered with, missing `sub`/`exp`, or expired
pub fn decode_at(
    token: &str,
    key: &DecodingKey,
    algorithms: &[Algorithm],
    now: DateTime<Utc>,
) -> Result<Claims, VerificationError> {
    let first = algorithms
        .first()
        .copied()
        .ok_or(VerificationError::InvalidAlgorithm)?;

    let mut validation = Validation::new(first);
    validation.algorithms = algorithms.to_vec();
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.leeway = 0;

    let claims = jsonwebtoken::decode::<Claims>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!("JWT decode error: {}", e);
            VerificationError::from(e)
        })?;

    if claims.is_expired_at(now) {
        return Err(VerificationError::Expired);
    }

    Ok(claims)
}
