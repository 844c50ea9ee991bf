//! Collaborator interfaces consumed by the token services.

pub mod client;
pub mod refresh_token;

pub use client::ClientDirectory;
pub use refresh_token::RefreshTokenRepository;

#[cfg(test)]
pub use client::MockClientDirectory;
#[cfg(test)]
pub use refresh_token::MockRefreshTokenRepository;
