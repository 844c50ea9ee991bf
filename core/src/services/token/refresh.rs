//! Refresh token service.
//!
//! Refresh tokens are opaque random strings, stored hashed. A token string
//! is replaced on every rotation, but the chain keeps its id and its
//! original `created_at`: the chain expiry caps how long a session can be
//! extended regardless of how often it rotates.

use std::sync::Arc;

use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::entities::claims::{Amr, Subject};
use crate::domain::entities::client::ClientConfig;
use crate::domain::entities::refresh_token::RefreshToken;
use crate::errors::{DomainError, TokenError};
use crate::repositories::refresh_token::RefreshTokenRepository;
use crate::services::clock::Clock;

const TOKEN_LENGTH: usize = 32;
const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A freshly issued refresh token.
///
/// The plaintext token string exists only in this value; storage keeps the
/// hash.
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    pub id: Uuid,
    pub token: String,
}

/// Service managing refresh token chains
pub struct RefreshTokenService<R: RefreshTokenRepository> {
    repository: R,
    clock: Arc<dyn Clock>,
}

impl<R: RefreshTokenRepository> RefreshTokenService<R> {
    pub fn new(repository: R, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Issues a new refresh token chain for a subject on a device.
    ///
    /// The token lifetime follows the client's per-method policy; the chain
    /// ceiling follows the client's `refresh_chain_expiry`.
    pub async fn issue(
        &self,
        subject: &Subject,
        device_id: &str,
        amr: Amr,
        client: &ClientConfig,
    ) -> Result<IssuedRefreshToken, DomainError> {
        let now = self.clock.now();
        let token = generate_token_string();
        let entity = RefreshToken::new(
            device_id,
            subject.encode(),
            amr,
            hash_token(&token),
            now,
            now + client.refresh_token_expiry.for_amr(amr),
            client.refresh_chain_expiry,
        );
        let saved = self.repository.save(entity).await?;
        Ok(IssuedRefreshToken {
            id: saved.id,
            token,
        })
    }

    /// Rotates the token string of an existing chain.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The replacement token string; the presented string
    ///   is no longer valid
    /// * `Err(DomainError)` - `InvalidToken` for an unknown id or a string
    ///   that does not match the stored hash; `ExpiredToken` when the token
    ///   or its chain has run out
    pub async fn rotate(
        &self,
        id: Uuid,
        presented: &str,
        client: &ClientConfig,
    ) -> Result<String, DomainError> {
        let mut entity = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TokenError::InvalidToken)?;

        if entity.token_hash != hash_token(presented) {
            return Err(TokenError::InvalidToken.into());
        }

        let now = self.clock.now();
        if entity.is_expired(now) || entity.is_chain_expired(now) {
            return Err(TokenError::ExpiredToken.into());
        }

        let token = generate_token_string();
        let expire_at = now + client.refresh_token_expiry.for_amr(entity.amr);
        entity.rotate(hash_token(&token), expire_at);
        self.repository.save(entity).await?;

        Ok(token)
    }

    /// Looks up and validates a presented token for a device.
    pub async fn verify(
        &self,
        device_id: &str,
        presented: &str,
    ) -> Result<RefreshToken, DomainError> {
        let entity = self
            .repository
            .find_by_device_and_hash(device_id, &hash_token(presented))
            .await?
            .ok_or(TokenError::InvalidToken)?;

        let now = self.clock.now();
        if entity.is_expired(now) || entity.is_chain_expired(now) {
            return Err(TokenError::ExpiredToken.into());
        }

        Ok(entity)
    }

    /// Revokes a refresh token chain
    pub async fn revoke(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repository.delete(id).await? {
            return Err(TokenError::InvalidToken.into());
        }
        Ok(())
    }

    /// Removes expired tokens from storage
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of tokens cleaned up
    pub async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        self.repository.delete_expired(self.clock.now()).await
    }
}

/// Hashes a token string for storage
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generates an opaque alphanumeric token string
fn generate_token_string() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_ALPHABET.len());
            TOKEN_ALPHABET[idx] as char
        })
        .collect()
}
