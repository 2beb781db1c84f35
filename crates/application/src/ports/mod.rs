//! Ports implemented by infrastructure adapters.

mod file_system;
mod storage;
mod transport;

pub use file_system::{FileSystem, FileSystemError};
pub use storage::{ScratchStorage, SessionStorage, StorageError};
pub use transport::{ApiRequest, HttpTransport, RawResponse, TransportError};
