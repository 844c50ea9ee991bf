//! Signing key entity and its lifecycle states.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};

use crate::errors::{DomainError, KeyStoreError};

/// Algorithm used for all access token signatures
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::RS256;

/// Lifecycle state of a signing key.
///
/// Exactly one key is `Active` at any time; it signs new tokens. Demoted
/// keys stay `CoolingDown`, then `Retired`, for verification only, until no
/// outstanding token could still reference them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Active,
    CoolingDown,
    Retired,
}

/// An asymmetric signing key pair with its lifecycle metadata.
///
/// The private material lives only inside the `jsonwebtoken` encoding key;
/// the public material is kept as PEM so it can be republished (JWKS).
#[derive(Clone)]
pub struct SigningKey {
    id: String,
    state: KeyState,
    created_at: DateTime<Utc>,
    demoted_at: Option<DateTime<Utc>>,
    public_key_pem: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("created_at", &self.created_at)
            .field("demoted_at", &self.demoted_at)
            .finish()
    }
}

impl SigningKey {
    /// Builds an active key from PEM-encoded material.
    ///
    /// # Arguments
    ///
    /// * `id` - Stable identifier correlating the private key and its public
    ///   counterpart; embedded as `kid` in token headers
    /// * `private_key_pem` - PKCS#8 PEM private key
    /// * `public_key_pem` - SPKI PEM public key
    /// * `created_at` - Creation instant (from the injected clock)
    pub fn from_pem(
        id: impl Into<String>,
        private_key_pem: &str,
        public_key_pem: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let encoding_key =
            EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).map_err(|e| {
                KeyStoreError::KeyGeneration {
                    message: format!("invalid private key material: {e}"),
                }
            })?;
        let decoding_key =
            DecodingKey::from_rsa_pem(public_key_pem.as_bytes()).map_err(|e| {
                KeyStoreError::KeyGeneration {
                    message: format!("invalid public key material: {e}"),
                }
            })?;

        Ok(Self {
            id: id.into(),
            state: KeyState::Active,
            created_at,
            demoted_at: None,
            public_key_pem: public_key_pem.to_string(),
            encoding_key,
            decoding_key,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> KeyState {
        self.state
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn demoted_at(&self) -> Option<DateTime<Utc>> {
        self.demoted_at
    }

    /// Private key handle for signing new tokens
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Public key handle for verifying token signatures
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Public key material in SPKI PEM form
    pub fn public_key_pem(&self) -> &str {
        &self.public_key_pem
    }

    /// Demotes the key out of active service, stamping the demotion instant
    pub fn demote(&mut self, now: DateTime<Utc>) {
        self.state = KeyState::CoolingDown;
        self.demoted_at = Some(now);
    }

    /// Marks a cooled-down key as retired
    pub fn retire(&mut self) {
        self.state = KeyState::Retired;
    }

    /// Whether the cool-down window since demotion has fully elapsed
    pub fn is_cool_down_complete(&self, now: DateTime<Utc>, cool_down: Duration) -> bool {
        match self.demoted_at {
            Some(demoted_at) => demoted_at + cool_down <= now,
            None => false,
        }
    }

    /// Whether no outstanding token could still reference this key.
    ///
    /// True once `cool_down + max_token_lifetime` has elapsed since
    /// demotion: a token signed the instant before demotion has expired by
    /// then, so the key can be purged.
    pub fn is_purgeable(
        &self,
        now: DateTime<Utc>,
        cool_down: Duration,
        max_token_lifetime: Duration,
    ) -> bool {
        match self.demoted_at {
            Some(demoted_at) => demoted_at + cool_down + max_token_lifetime <= now,
            None => false,
        }
    }
}
