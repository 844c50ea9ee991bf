//! Business services containing the token core's logic.

pub mod clock;
pub mod token;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use token::{
    AccessJwtToken, IssuedRefreshToken, JwksSettings, KeyRotationService, PublicKeyEntry,
    RefreshTokenService, RotationSummary, SigningKeyStore, TokenFactory,
};
