//! Refresh token entity.
//!
//! Only the sha256 hash of the opaque token string is stored; the plaintext
//! is returned to the caller once at issuance and never kept.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::claims::Amr;

/// A stored refresh token and its rotation chain metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    /// Unique identifier, stable across rotations of the same chain
    pub id: Uuid,

    /// Device the token was issued to
    pub device_id: String,

    /// Serialized subject (`sub` claim encoding)
    pub subject: String,

    /// Authentication method that opened the session
    pub amr: Amr,

    /// sha256 hex hash of the current token string
    pub token_hash: String,

    /// Expiry of the current token string
    pub expire_at: DateTime<Utc>,

    /// Start of the rotation chain; preserved across rotations
    pub created_at: DateTime<Utc>,

    /// Ceiling on how long the chain may keep being rotated
    pub refresh_chain_expiry: Duration,
}

impl RefreshToken {
    pub fn new(
        device_id: impl Into<String>,
        subject: impl Into<String>,
        amr: Amr,
        token_hash: impl Into<String>,
        created_at: DateTime<Utc>,
        expire_at: DateTime<Utc>,
        refresh_chain_expiry: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            device_id: device_id.into(),
            subject: subject.into(),
            amr,
            token_hash: token_hash.into(),
            expire_at,
            created_at,
            refresh_chain_expiry,
        }
    }

    /// Whether the current token string has expired
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_at < now
    }

    /// Whether the rotation chain as a whole has run out
    pub fn is_chain_expired(&self, now: DateTime<Utc>) -> bool {
        self.created_at + self.refresh_chain_expiry < now
    }

    /// Installs a rotated token string and its new expiry.
    ///
    /// `created_at` is deliberately left untouched: the chain ceiling is
    /// measured from the first issuance, not the latest rotation.
    pub fn rotate(&mut self, token_hash: impl Into<String>, expire_at: DateTime<Utc>) {
        self.token_hash = token_hash.into();
        self.expire_at = expire_at;
    }
}
