//! Refresh token repository trait defining the persistence interface.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::refresh_token::RefreshToken;
use crate::errors::DomainError;

/// Repository contract for refresh token persistence.
///
/// Implementations must only ever see hashed token values; hashing is the
/// service's responsibility.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Save a new or rotated refresh token
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved token
    /// * `Err(DomainError)` - Save failed
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a refresh token by chain identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError>;

    /// Find a refresh token by device and hashed token value
    async fn find_by_device_and_hash(
        &self,
        device_id: &str,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Delete a refresh token chain
    ///
    /// # Returns
    /// * `Ok(true)` - Token existed and was deleted
    /// * `Ok(false)` - No token with the given id
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Delete every token whose expiry is before the given instant
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens deleted
    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<usize, DomainError>;
}
