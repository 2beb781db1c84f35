//! File system port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// File system failures.
#[derive(Debug, Error)]
pub enum FileSystemError {
    /// The path does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Access to the path was denied.
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Port for the file operations the persistence layer needs.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Reads a file into memory.
    ///
    /// # Errors
    ///
    /// Returns a [`FileSystemError`] when the file is missing or
    /// unreadable.
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError>;

    /// Writes a file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns a [`FileSystemError`] when the file cannot be written.
    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError>;

    /// Whether the path exists.
    async fn exists(&self, path: &Path) -> bool;

    /// Removes a file.
    ///
    /// # Errors
    ///
    /// Returns a [`FileSystemError`] when removal fails.
    async fn remove_file(&self, path: &Path) -> Result<(), FileSystemError>;

    /// Creates a directory and all of its parents.
    ///
    /// # Errors
    ///
    /// Returns a [`FileSystemError`] when creation fails.
    async fn create_dir_all(&self, path: &Path) -> Result<(), FileSystemError>;
}
