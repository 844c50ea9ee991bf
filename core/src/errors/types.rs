//! Error type definitions for token issuance and verification.
//!
//! Token failures are surfaced to callers as typed, immutable values with a
//! stable machine-readable code; the transport layer maps codes to HTTP
//! statuses. Key-store internals (which key was missing, rotation state) are
//! never carried in the caller-facing variants.

use thiserror::Error;

/// Failures surfaced by the token factory to its callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed structure, unknown or purged key id, signature or issuer
    /// mismatch, or unparseable claims. Not retryable.
    #[error("invalid token")]
    InvalidToken,

    /// Structurally and cryptographically valid, but past its expiry
    /// instant. Distinguished from `InvalidToken` so callers can prompt a
    /// refresh flow instead of a full re-authentication.
    #[error("token is expired")]
    ExpiredToken,

    /// Issuance requested for an unknown client identifier.
    #[error("client not found: {client_id}")]
    ClientNotFound { client_id: String },

    /// No active signing key, or the signing operation itself failed. Must
    /// never occur in a correctly operating deployment; treated as fatal.
    #[error("no active signing key available")]
    SigningUnavailable,
}

impl TokenError {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidToken => "invalid-token",
            TokenError::ExpiredToken => "expired-token",
            TokenError::ClientNotFound { .. } => "invalid-client",
            TokenError::SigningUnavailable => "signing-unavailable",
        }
    }
}

/// Internal failures of the signing key store.
///
/// These never cross the token factory boundary as-is: a missing
/// verification key becomes `TokenError::InvalidToken`, a missing active key
/// becomes `TokenError::SigningUnavailable`.
#[derive(Error, Debug)]
pub enum KeyStoreError {
    #[error("no active signing key")]
    NoActiveKey,

    #[error("signing key not found: {id}")]
    KeyNotFound { id: String },

    #[error("key generation failed: {message}")]
    KeyGeneration { message: String },
}
