//! # Identity Platform Core
//!
//! Core token issuance and verification logic for the identity platform
//! backend. This crate contains the claims model, the rotating signing key
//! store, the JWT token factory, and the collaborator traits (clock, client
//! directory, refresh token persistence) consumed by the outer layers.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
