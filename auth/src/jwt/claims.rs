use std::collections::HashMap;

use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::jwt::errors::JwtError;

const USERNAME_CLAIM: &str = "username";

/// Upper bound on token lifetime (ten years).
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365 * 10;

/// JWT claims structure.
///
/// Carries the identity reference in `sub` and the username as a custom claim.
/// `exp` is only present when the issuer opts into expiring tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (identity identifier)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create new empty claims.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the payload for a resolved or freshly created identity.
    ///
    /// # Arguments
    /// * `identity_id` - Opaque identity reference (stored in `sub`)
    /// * `username` - Username (stored in `extra.username`)
    ///
    /// # Returns
    /// Claims with sub, iat, and username set and no expiration
    pub fn for_identity(identity_id: impl ToString, username: impl Into<String>) -> Self {
        let mut extra = HashMap::new();
        extra.insert(
            USERNAME_CLAIM.to_string(),
            serde_json::Value::String(username.into()),
        );

        Self {
            sub: Some(identity_id.to_string()),
            iat: Some(Utc::now().timestamp()),
            exp: None,
            extra,
        }
    }

    /// Set expiration relative to `iat` (or now, when `iat` is unset).
    ///
    /// `hours` must lie in `1..=MAX_EXPIRATION_HOURS`; anything else would
    /// yield a token that is already expired or an unrepresentable timestamp.
    pub fn with_expiration_hours(mut self, hours: i64) -> Result<Self, JwtError> {
        if !(1..=MAX_EXPIRATION_HOURS).contains(&hours) {
            return Err(JwtError::InvalidExpiration(hours));
        }

        let issued_at = self.iat.unwrap_or_else(|| Utc::now().timestamp());
        let exp = Duration::try_hours(hours)
            .and_then(|lifetime| issued_at.checked_add(lifetime.num_seconds()))
            .ok_or(JwtError::InvalidExpiration(hours))?;

        self.exp = Some(exp);
        Ok(self)
    }

    /// Get username from extra fields.
    pub fn username(&self) -> Option<&str> {
        self.extra.get(USERNAME_CLAIM).and_then(|v| v.as_str())
    }
}
