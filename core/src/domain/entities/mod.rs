//! Domain entities representing the token core's business objects.

pub mod claims;
pub mod client;
pub mod refresh_token;
pub mod signing_key;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use claims::{Amr, ClaimSet, Claims, CustomClaim, Subject};
pub use client::{ClientConfig, RefreshTokenExpiry};
pub use refresh_token::RefreshToken;
pub use signing_key::{KeyState, SigningKey, SIGNING_ALGORITHM};
