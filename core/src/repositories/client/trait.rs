//! Client directory trait defining the per-client configuration lookup.

use async_trait::async_trait;

use crate::domain::entities::client::ClientConfig;
use crate::errors::DomainError;

/// Lookup of per-client token policy.
///
/// Implementations (configuration files, database, cache) live in the outer
/// layers; the token factory only depends on this contract.
#[async_trait]
pub trait ClientDirectory: Send + Sync {
    /// Resolve the configuration for a client identifier
    ///
    /// # Returns
    /// * `Ok(Some(ClientConfig))` - Client is registered
    /// * `Ok(None)` - Unknown client identifier
    /// * `Err(DomainError)` - Lookup failed
    async fn find_client(&self, client_id: &str) -> Result<Option<ClientConfig>, DomainError>;
}
