//! Domain error types

use thiserror::Error;

/// Domain-level errors raised during client-side validation, before any
/// network call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required numeric identifier is missing or out of range.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A required field is empty or absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A single-use token is absent or has expired.
    #[error("{0} token missing or expired; verify again")]
    TokenUnavailable(&'static str),

    /// A configured URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
