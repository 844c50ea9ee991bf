//! Mock implementation of ClientDirectory for testing

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::entities::client::ClientConfig;
use crate::errors::DomainError;

use super::r#trait::ClientDirectory;

/// In-memory client directory for tests
#[derive(Default)]
pub struct MockClientDirectory {
    clients: HashMap<String, ClientConfig>,
}

impl MockClientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client configuration
    pub fn with_client(mut self, config: ClientConfig) -> Self {
        self.clients.insert(config.client_id.clone(), config);
        self
    }
}

#[async_trait]
impl ClientDirectory for MockClientDirectory {
    async fn find_client(&self, client_id: &str) -> Result<Option<ClientConfig>, DomainError> {
        Ok(self.clients.get(client_id).cloned())
    }
}
