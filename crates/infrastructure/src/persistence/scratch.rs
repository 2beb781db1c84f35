//! In-memory session-scoped storage.
//!
//! The process-lifetime analogue of browser session storage: signup and
//! password-reset tokens live here and are gone on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use ladle_application::ScratchStorage;
use ladle_domain::ScratchToken;
use tokio::sync::RwLock;

/// Session-scoped token storage.
#[derive(Debug, Default)]
pub struct InMemoryScratchStorage {
    tokens: RwLock<HashMap<String, ScratchToken>>,
}

impl InMemoryScratchStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScratchStorage for InMemoryScratchStorage {
    async fn get(&self, key: &str) -> Option<ScratchToken> {
        self.tokens.read().await.get(key).cloned()
    }

    async fn put(&self, key: &str, token: ScratchToken) {
        self.tokens.write().await.insert(key.to_string(), token);
    }

    async fn remove(&self, key: &str) {
        self.tokens.write().await.remove(key);
    }
}
