//! Mock implementation of RefreshTokenRepository for testing

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::refresh_token::RefreshToken;
use crate::errors::DomainError;

use super::r#trait::RefreshTokenRepository;

/// In-memory refresh token repository for tests
pub struct MockRefreshTokenRepository {
    tokens: Arc<RwLock<HashMap<Uuid, RefreshToken>>>,
}

impl MockRefreshTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored tokens
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }
}

impl Default for MockRefreshTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(&id).cloned())
    }

    async fn find_by_device_and_hash(
        &self,
        device_id: &str,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .find(|t| t.device_id == device_id && t.token_hash == token_hash)
            .cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens.remove(&id).is_some())
    }

    async fn delete_expired(&self, before: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let before_count = tokens.len();
        tokens.retain(|_, t| t.expire_at >= before);
        Ok(before_count - tokens.len())
    }
}
