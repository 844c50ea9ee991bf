//! Token service module for JWT issuance and verification
//!
//! This module covers:
//! - Access token issuance and verification (RS256)
//! - The rotating signing key store and its background rotation task
//! - Refresh token issuance, rotation, and revocation
//! - JWKS settings shared by issuance and verification

mod factory;
mod key_store;
mod refresh;
mod rotation;
mod settings;

#[cfg(test)]
mod tests;

pub use factory::{AccessJwtToken, TokenFactory};
pub use key_store::{PublicKeyEntry, RotationSummary, SigningKeyStore};
pub use refresh::{IssuedRefreshToken, RefreshTokenService};
pub use rotation::KeyRotationService;
pub use settings::JwksSettings;

pub(crate) use factory::TokenPayload;
