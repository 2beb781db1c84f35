//! Persistence adapters for the storage ports.

mod file_system;
mod scratch;
mod session_repository;

use std::path::PathBuf;

pub use file_system::TokioFileSystem;
pub use scratch::InMemoryScratchStorage;
pub use session_repository::FileSessionRepository;

/// Default data directory for the persisted session
/// (`<platform data dir>/ladle`).
#[must_use]
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("ladle"))
}
