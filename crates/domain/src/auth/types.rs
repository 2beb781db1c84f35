//! Authentication request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::session::{TokenPair, UserProfile};

/// Login credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials from owned or borrowed strings.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration form submitted with a verified signup token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Display name.
    pub name: String,
}

impl RegisterForm {
    /// Validates the form before dispatch.
    ///
    /// # Errors
    ///
    /// Returns a [`DomainError`] when a required field is empty.
    pub fn validate(&self) -> DomainResult<()> {
        if self.email.trim().is_empty() {
            return Err(DomainError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(DomainError::MissingField("password"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        Ok(())
    }
}

/// User identity as embedded in a login reply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantUser {
    /// Server-assigned user number.
    #[serde(default)]
    pub user_no: Option<u64>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Reply from `POST /auth/login` and `POST /auth/refresh`.
///
/// The backend has returned the user either as a nested `user` object or
/// as flat `userNo` / `name` fields; both shapes decode here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    /// Newly issued access token.
    #[serde(default)]
    pub access_token: String,
    /// Newly issued refresh token, when the deployment returns one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Nested user identity.
    #[serde(default)]
    pub user: Option<GrantUser>,
    /// Flat user number, used when `user` is absent.
    #[serde(default)]
    pub user_no: Option<u64>,
    /// Flat display name, used when `user` is absent.
    #[serde(default)]
    pub name: Option<String>,
}

impl TokenGrant {
    /// Extracts the issued token pair.
    #[must_use]
    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }

    /// Normalizes the user identity, preferring the nested object.
    ///
    /// Missing pieces default to `0` / empty string.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        let (user_no, name) = self.user.as_ref().map_or_else(
            || (self.user_no, self.name.clone()),
            |nested| (nested.user_no, nested.name.clone()),
        );
        UserProfile {
            user_no: user_no.unwrap_or(0),
            name: name.unwrap_or_default(),
        }
    }
}

/// Reply from the verification endpoints that issue a single-use token
/// (`/auth/register/verify`, `/auth/password/find`, `/auth/password/verify`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    /// The single-use token, absent when the server declined to issue one.
    #[serde(default)]
    pub reset_token: Option<String>,
    /// Seconds until the token expires.
    #[serde(default)]
    pub expires_in_sec: Option<u64>,
}

/// A single-use token held in session-scoped storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchToken {
    /// The token value.
    pub value: String,
    /// Expiry instant, `None` when the server gave no TTL.
    pub expires_at: Option<DateTime<Utc>>,
}

impl ScratchToken {
    /// Creates a token expiring `ttl_secs` from now, or never.
    #[must_use]
    pub fn new(value: impl Into<String>, ttl_secs: Option<u64>) -> Self {
        let expires_at = ttl_secs
            .map(|secs| Utc::now() + chrono::Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Returns true once the TTL has elapsed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Utc::now() >= at)
    }
}
