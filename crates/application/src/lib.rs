//! Ladle Application - Client logic and ports
//!
//! This crate holds the API client with its refresh-and-retry protocol,
//! the session store, the auth and recipe stores, and the ports that
//! infrastructure adapters implement.

pub mod client;
pub mod error;
pub mod guard;
pub mod ports;
pub mod session;
pub mod stores;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{ApiClient, REFRESH_PATH, RefreshGate};
pub use error::{ApiError, ApiResult};
pub use guard::{GuardDecision, RouteMeta};
pub use ports::{
    ApiRequest, FileSystem, FileSystemError, HttpTransport, RawResponse, ScratchStorage,
    SessionStorage, StorageError, TransportError,
};
pub use session::SessionStore;
pub use stores::{AuthStore, Filters, ListArgs, RecipeListState, RecipeStore};
