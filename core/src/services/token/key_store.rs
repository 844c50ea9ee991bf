//! Rotating signing key store.
//!
//! Exclusive source of truth for which key signs new tokens and which keys
//! may verify existing ones. The key table lives behind a read-write lock:
//! `issue`/`decode` paths take read access, the rotation tick is the single
//! writer. Key generation happens outside the lock so readers only ever wait
//! for the state swap itself, and always observe the table either fully
//! before or fully after a rotation.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use jsonwebtoken::DecodingKey;
use rand::rngs::OsRng;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::signing_key::{KeyState, SigningKey};
use crate::errors::{DomainError, KeyStoreError};
use crate::services::clock::Clock;

use super::settings::JwksSettings;

const RSA_KEY_BITS: usize = 2048;

/// Public half of a stored key, for JWKS publication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKeyEntry {
    pub id: String,
    pub public_key_pem: String,
}

/// Outcome of a single rotation tick
#[derive(Debug, Clone, Default)]
pub struct RotationSummary {
    /// Id of the newly activated key
    pub activated: String,
    /// Id of the key demoted to cooling-down, if one was active
    pub demoted: Option<String>,
    /// Keys whose cool-down completed this tick
    pub retired: Vec<String>,
    /// Keys dropped from the table this tick
    pub purged: Vec<String>,
}

/// Store of the active signing key plus all keys still valid for
/// verification
pub struct SigningKeyStore {
    settings: JwksSettings,
    clock: Arc<dyn Clock>,
    keys: RwLock<Vec<SigningKey>>,
}

impl SigningKeyStore {
    /// Creates a store with a freshly generated active key.
    ///
    /// Generating the first key here means the single-active-key invariant
    /// holds from construction onward; `current_signing_key` failing later
    /// indicates a defect, not a startup race.
    ///
    /// # Returns
    ///
    /// * `Ok(SigningKeyStore)` - Store ready to sign and verify
    /// * `Err(DomainError)` - Inconsistent settings or key generation failure
    pub fn new(settings: JwksSettings, clock: Arc<dyn Clock>) -> Result<Self, DomainError> {
        settings.validate()?;
        let initial = generate_signing_key(clock.now())?;
        debug!(key_id = %initial.id(), "generated initial signing key");
        Ok(Self {
            settings,
            clock,
            keys: RwLock::new(vec![initial]),
        })
    }

    /// Returns the single active key used for new issuance
    ///
    /// # Returns
    ///
    /// * `Ok(SigningKey)` - The active key
    /// * `Err(DomainError)` - No active key (`KeyStoreError::NoActiveKey`);
    ///   must never occur in a correctly operating deployment
    pub fn current_signing_key(&self) -> Result<SigningKey, DomainError> {
        let keys = self.read_keys()?;
        keys.iter()
            .find(|key| key.state() == KeyState::Active)
            .cloned()
            .ok_or_else(|| KeyStoreError::NoActiveKey.into())
    }

    /// Looks up a verification key by key id.
    ///
    /// Active, cooling-down, and retired-but-unpurged keys all verify;
    /// absent or purged ids fail with `KeyStoreError::KeyNotFound`.
    pub fn verification_key(&self, id: &str) -> Result<DecodingKey, DomainError> {
        let keys = self.read_keys()?;
        keys.iter()
            .find(|key| key.id() == id)
            .map(|key| key.decoding_key().clone())
            .ok_or_else(|| {
                KeyStoreError::KeyNotFound {
                    id: id.to_string(),
                }
                .into()
            })
    }

    /// Public halves of every key still valid for verification
    pub fn verification_keys(&self) -> Result<Vec<PublicKeyEntry>, DomainError> {
        let keys = self.read_keys()?;
        Ok(keys
            .iter()
            .map(|key| PublicKeyEntry {
                id: key.id().to_string(),
                public_key_pem: key.public_key_pem().to_string(),
            })
            .collect())
    }

    /// Id and state of every stored key (diagnostics)
    pub fn snapshot(&self) -> Result<Vec<(String, KeyState)>, DomainError> {
        let keys = self.read_keys()?;
        Ok(keys
            .iter()
            .map(|key| (key.id().to_string(), key.state()))
            .collect())
    }

    /// Runs one rotation tick.
    ///
    /// Generates a fresh key pair, activates it, demotes the previously
    /// active key to cooling-down, retires keys whose cool-down elapsed, and
    /// purges keys no outstanding token could still reference. The caller
    /// (the rotation service) guarantees a single tick in flight at a time;
    /// the write lock covers only the in-memory swap and sweep.
    pub fn rotate(&self) -> Result<RotationSummary, DomainError> {
        let now = self.clock.now();
        // Expensive: keep the RSA generation outside the lock
        let fresh = generate_signing_key(now)?;

        let mut keys = self
            .keys
            .write()
            .map_err(|_| DomainError::Internal {
                message: "signing key store lock poisoned".to_string(),
            })?;

        let mut summary = RotationSummary {
            activated: fresh.id().to_string(),
            ..RotationSummary::default()
        };

        for key in keys.iter_mut() {
            if key.state() == KeyState::Active {
                key.demote(now);
                summary.demoted = Some(key.id().to_string());
            }
        }
        keys.push(fresh);

        for key in keys.iter_mut() {
            if key.state() == KeyState::CoolingDown
                && key.is_cool_down_complete(now, self.settings.cool_down_period)
            {
                key.retire();
                summary.retired.push(key.id().to_string());
            }
        }

        keys.retain(|key| {
            let purge = key.is_purgeable(
                now,
                self.settings.cool_down_period,
                self.settings.max_token_lifetime,
            );
            if purge {
                summary.purged.push(key.id().to_string());
            }
            !purge
        });

        Ok(summary)
    }

    fn read_keys(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<SigningKey>>, DomainError> {
        self.keys.read().map_err(|_| DomainError::Internal {
            message: "signing key store lock poisoned".to_string(),
        })
    }
}

impl std::fmt::Debug for SigningKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyStore")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Generates a fresh RSA key pair wrapped as an active signing key
fn generate_signing_key(now: DateTime<Utc>) -> Result<SigningKey, DomainError> {
    let private_key =
        RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS).map_err(|e| KeyStoreError::KeyGeneration {
            message: format!("rsa generation failed: {e}"),
        })?;
    let public_key = private_key.to_public_key();

    let private_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .map_err(|e| KeyStoreError::KeyGeneration {
            message: format!("private key encoding failed: {e}"),
        })?
        .to_string();
    let public_pem =
        public_key
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| KeyStoreError::KeyGeneration {
                message: format!("public key encoding failed: {e}"),
            })?;

    SigningKey::from_pem(Uuid::new_v4().to_string(), &private_pem, &public_pem, now)
}
