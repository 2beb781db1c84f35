//! Client configuration.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// How the client obtains a new access token after a 401.
///
/// This is a single configured policy; no call site hard-codes a
/// transport path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStrategy {
    /// Try the cookie path first, then fall back to sending the stored
    /// refresh token in the body. Reproduces the backend's most complete
    /// deployment.
    #[default]
    CookieThenBody,
    /// Only the cookie path; never send the refresh token in a body.
    CookieOnly,
    /// Only the body path; skip the cookie attempt entirely.
    BodyOnly,
}

impl RefreshStrategy {
    /// Whether the protocol starts with a bodyless (cookie) attempt.
    #[must_use]
    pub const fn tries_cookie(self) -> bool {
        matches!(self, Self::CookieThenBody | Self::CookieOnly)
    }

    /// Whether the protocol may send the refresh token in the body.
    #[must_use]
    pub const fn tries_body(self) -> bool {
        matches!(self, Self::CookieThenBody | Self::BodyOnly)
    }
}

/// Transport and policy configuration for the API client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL all request paths are joined onto.
    pub base_url: Url,
    /// Refresh transport policy.
    #[serde(default)]
    pub refresh_strategy: RefreshStrategy,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// User-Agent header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    "Ladle/0.1.0".to_string()
}

impl ClientConfig {
    /// Builds a configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] when the URL does not parse.
    pub fn for_base_url(base_url: &str) -> DomainResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| DomainError::InvalidUrl(format!("{e}: {base_url}")))?;
        Ok(Self {
            base_url,
            refresh_strategy: RefreshStrategy::default(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        })
    }

    /// Sets the refresh strategy.
    #[must_use]
    pub const fn with_refresh_strategy(mut self, strategy: RefreshStrategy) -> Self {
        self.refresh_strategy = strategy;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        // The development backend the original client pointed at.
        #[allow(clippy::unwrap_used)]
        let base_url = Url::parse("http://localhost:8080").unwrap();
        Self {
            base_url,
            refresh_strategy: RefreshStrategy::default(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_strategy_tries_both_paths() {
        let strategy = RefreshStrategy::default();
        assert!(strategy.tries_cookie());
        assert!(strategy.tries_body());
    }

    #[test]
    fn body_only_skips_cookie_attempt() {
        assert!(!RefreshStrategy::BodyOnly.tries_cookie());
        assert!(RefreshStrategy::BodyOnly.tries_body());
    }

    #[test]
    fn cookie_only_never_sends_body() {
        assert!(RefreshStrategy::CookieOnly.tries_cookie());
        assert!(!RefreshStrategy::CookieOnly.tries_body());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(ClientConfig::for_base_url("not a url").is_err());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = ClientConfig::for_base_url("https://api.example.com").unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let restored: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
