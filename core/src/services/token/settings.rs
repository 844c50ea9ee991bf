//! JWKS settings shared by token issuance, verification, and key rotation.

use chrono::Duration;

use crate::errors::DomainError;

/// Settings for the signing key set and the tokens it signs
#[derive(Debug, Clone)]
pub struct JwksSettings {
    /// Issuer string stamped into and required from every token
    pub issuer: String,
    /// How often a fresh signing key replaces the active one
    pub key_rotation_period: Duration,
    /// How long a demoted key keeps verifying already-issued tokens.
    /// Must be at least `max_token_lifetime`, otherwise a token signed just
    /// before a rotation could outlive its verification key.
    pub cool_down_period: Duration,
    /// The longest access token lifetime any client may configure
    pub max_token_lifetime: Duration,
}

impl Default for JwksSettings {
    fn default() -> Self {
        Self {
            issuer: "idp-auth".to_string(),
            key_rotation_period: Duration::days(1),
            cool_down_period: Duration::days(1),
            max_token_lifetime: Duration::hours(1),
        }
    }
}

impl JwksSettings {
    /// Creates settings from environment variables, falling back to defaults
    ///
    /// Recognized variables: `JWKS_ISSUER`, `JWKS_KEY_ROTATION_HOURS`,
    /// `JWKS_COOL_DOWN_HOURS`, `JWKS_MAX_TOKEN_LIFETIME_MINUTES`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            issuer: std::env::var("JWKS_ISSUER").unwrap_or(defaults.issuer),
            key_rotation_period: std::env::var("JWKS_KEY_ROTATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::hours)
                .unwrap_or(defaults.key_rotation_period),
            cool_down_period: std::env::var("JWKS_COOL_DOWN_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::hours)
                .unwrap_or(defaults.cool_down_period),
            max_token_lifetime: std::env::var("JWKS_MAX_TOKEN_LIFETIME_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::minutes)
                .unwrap_or(defaults.max_token_lifetime),
        }
    }

    /// Checks internal consistency of the settings
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.cool_down_period < self.max_token_lifetime {
            return Err(DomainError::Validation {
                message: format!(
                    "cool_down_period ({}) must cover max_token_lifetime ({})",
                    self.cool_down_period, self.max_token_lifetime
                ),
            });
        }
        Ok(())
    }
}
