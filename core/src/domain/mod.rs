//! Domain layer containing the business entities of the token core.

pub mod entities;

// Re-export commonly used domain types
pub use entities::*;
