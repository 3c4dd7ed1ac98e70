/// JWT Claims structure
///
/// Represents the payload of a token: the registered `sub` and `exp`
/// claims, the `token_type` tag and any caller-supplied extra claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim names that extra claims may never override
pub const RESERVED_CLAIMS: [&str; 3] = ["sub", "exp", "token_type"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (principal identifier)
    pub sub: String,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
    /// Access/refresh marker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn new(sub: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: sub.into(),
            exp: expires_at.timestamp(),
            token_type: None,
            extra: Map::new(),
        }
    }

    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    /// Merge extra claims; reserved names are dropped so the explicit
    /// fields always take precedence.
    pub fn with_extra(mut self, extra: Map<String, Value>) -> Self {
        for (key, value) in extra {
            if RESERVED_CLAIMS.contains(&key.as_str()) {
                tracing::debug!(claim = %key, "Ignoring reserved claim in extra claims");
                continue;
            }
            self.extra.insert(key, value);
        }
        self
    }

    /// Whether the token is expired at `now` (no leeway)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn has_token_type(&self, expected: &str) -> bool {
        self.token_type.as_deref() == Some(expected)
    }
}
