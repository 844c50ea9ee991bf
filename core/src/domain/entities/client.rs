//! Per-client token policy.
//!
//! Owned by the client configuration collaborator; read-only at issuance
//! time.

use std::collections::HashMap;

use chrono::Duration;

use crate::domain::entities::claims::Amr;

/// Refresh token lifetimes per authentication method
#[derive(Debug, Clone)]
pub struct RefreshTokenExpiry {
    pub mfa: Duration,
    pub pwd: Duration,
    pub bio: Duration,
    pub net: Duration,
    pub otp: Duration,
}

impl Default for RefreshTokenExpiry {
    fn default() -> Self {
        Self {
            mfa: Duration::minutes(30),
            pwd: Duration::minutes(30),
            bio: Duration::minutes(30),
            net: Duration::days(3),
            otp: Duration::minutes(10),
        }
    }
}

impl RefreshTokenExpiry {
    /// Lifetime for a refresh token minted after the given method
    pub fn for_amr(&self, amr: Amr) -> Duration {
        match amr {
            Amr::Mfa => self.mfa,
            Amr::Pwd => self.pwd,
            Amr::Bio => self.bio,
            Amr::Net => self.net,
            Amr::Otp => self.otp,
        }
    }
}

/// Token policy for one registered client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_id: String,
    /// Access token lifetime
    pub access_token_expiry: Duration,
    /// Refresh token lifetimes per authentication method
    pub refresh_token_expiry: RefreshTokenExpiry,
    /// Hard ceiling on how long a refresh chain may be extended
    pub refresh_chain_expiry: Duration,
    /// Feature-flag tags keyed by subject identifier
    pub flags: HashMap<String, Vec<String>>,
}

impl ClientConfig {
    /// Creates a configuration with the default policy
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            access_token_expiry: Duration::minutes(10),
            refresh_token_expiry: RefreshTokenExpiry::default(),
            refresh_chain_expiry: Duration::days(10),
            flags: HashMap::new(),
        }
    }

    /// Computes the `flags` claim value for a subject identifier.
    ///
    /// Deterministic: the identifier's configured tags joined with `,`, or
    /// an empty string when none are configured.
    pub fn compute_flags(&self, identifier: &str) -> String {
        match self.flags.get(identifier) {
            Some(tags) => tags.join(","),
            None => String::new(),
        }
    }
}
