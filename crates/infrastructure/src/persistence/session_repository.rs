//! File-backed session repository.
//!
//! The session is stored as deterministic JSON at
//! `<data_dir>/session.json`. An absent file reads as "logged out".

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ladle_application::{FileSystem, SessionStorage, StorageError};
use ladle_domain::Session;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Durable session storage over the `FileSystem` port.
#[derive(Debug, Clone)]
pub struct FileSessionRepository<F> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> FileSessionRepository<F> {
    /// Creates a repository rooted at `data_dir`.
    pub fn new(fs: F, data_dir: &Path) -> Self {
        Self {
            fs,
            path: data_dir.join("session.json"),
        }
    }

    /// Path of the session file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<F: FileSystem> SessionStorage for FileSessionRepository<F> {
    async fn load(&self) -> Result<Option<Session>, StorageError> {
        if !self.fs.exists(&self.path).await {
            return Ok(None);
        }

        let bytes = self
            .fs
            .read_file(&self.path)
            .await
            .map_err(|error| StorageError::Io(error.to_string()))?;

        let session: Session = from_json_bytes(&bytes)
            .map_err(|error| StorageError::Serialization(error.to_string()))?;
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<(), StorageError> {
        let bytes = to_json_stable_bytes(session)
            .map_err(|error| StorageError::Serialization(error.to_string()))?;

        self.fs
            .write_file(&self.path, &bytes)
            .await
            .map_err(|error| StorageError::Io(error.to_string()))
    }

    async fn clear(&self) -> Result<(), StorageError> {
        if self.fs.exists(&self.path).await {
            self.fs
                .remove_file(&self.path)
                .await
                .map_err(|error| StorageError::Io(error.to_string()))?;
        }
        Ok(())
    }
}
