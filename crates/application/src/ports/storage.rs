//! Storage ports for session persistence.

use async_trait::async_trait;
use ladle_domain::{ScratchToken, Session};
use thiserror::Error;

/// Storage failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// An I/O operation failed.
    #[error("storage I/O error: {0}")]
    Io(String),

    /// Serialization or deserialization failed.
    #[error("storage serialization error: {0}")]
    Serialization(String),
}

/// Port for the durable session record (tokens plus cached user fields).
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Loads the persisted session, `None` when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the record exists but cannot be
    /// read or parsed.
    async fn load(&self) -> Result<Option<Session>, StorageError>;

    /// Persists the session.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the record cannot be written.
    async fn save(&self, session: &Session) -> Result<(), StorageError>;

    /// Removes the persisted session.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when removal fails.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// Port for session-scoped single-use tokens (signup, password reset).
///
/// Implementations live for the process only; nothing here survives a
/// restart.
#[async_trait]
pub trait ScratchStorage: Send + Sync {
    /// Returns the token stored under `key`, expired or not.
    async fn get(&self, key: &str) -> Option<ScratchToken>;

    /// Stores a token under `key`, replacing any previous value.
    async fn put(&self, key: &str, token: ScratchToken);

    /// Removes the token stored under `key`.
    async fn remove(&self, key: &str);
}
