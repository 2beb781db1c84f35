//! Session state and token types.

use serde::{Deserialize, Serialize};

/// Display identity of the logged-in user, cached alongside the tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Server-assigned user number.
    pub user_no: u64,
    /// Display name.
    pub name: String,
}

/// A pair of credentials issued by login or refresh.
///
/// The refresh token is optional: cookie-based deployments never return
/// one in the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Short-lived credential sent with each authenticated request.
    #[serde(default)]
    pub access_token: String,
    /// Longer-lived credential used to obtain a new access token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenPair {
    /// Creates a pair from an access token only.
    #[must_use]
    pub fn access_only(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }
}

/// The authenticated session: tokens plus cached user identity.
///
/// Invariant: `is_authenticated() ⟺ !access_token.is_empty()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Current access token, empty when logged out.
    #[serde(default)]
    pub access_token: String,
    /// Current refresh token, empty when none was issued.
    #[serde(default)]
    pub refresh_token: String,
    /// Cached user identity, `None` when logged out.
    #[serde(default)]
    pub user: Option<UserProfile>,
}

impl Session {
    /// Returns true when an access token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Applies an issued token pair.
    ///
    /// Empty or absent fields leave the stored value alone: a refresh
    /// that returns only a new access token must not discard the stored
    /// refresh token.
    pub fn apply_tokens(&mut self, pair: &TokenPair) {
        if !pair.access_token.is_empty() {
            self.access_token.clone_from(&pair.access_token);
        }
        if let Some(refresh) = &pair.refresh_token
            && !refresh.is_empty()
        {
            self.refresh_token.clone_from(refresh);
        }
    }

    /// Erases tokens and user identity (logout semantics).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
