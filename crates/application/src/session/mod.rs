//! Session store: the injectable authentication context.
//!
//! Holds the current [`Session`] in memory, persists it through the
//! [`SessionStorage`] port on each mutation, and keeps single-use
//! signup/reset tokens in session-scoped [`ScratchStorage`]. There is no
//! process-wide singleton; the store is a cloneable handle passed to the
//! client and the stores.

use std::sync::Arc;

use ladle_domain::{ScratchToken, Session, TokenPair, UserProfile};
use tokio::sync::RwLock;

use crate::ports::{ScratchStorage, SessionStorage, StorageError};

const SIGNUP_TOKEN_KEY: &str = "signupToken";
const RESET_TOKEN_KEY: &str = "pwResetToken";

/// Shared handle to the authenticated session.
#[derive(Clone)]
pub struct SessionStore {
    session: Arc<RwLock<Session>>,
    storage: Arc<dyn SessionStorage>,
    scratch: Arc<dyn ScratchStorage>,
}

impl SessionStore {
    /// Creates an empty (logged-out) store over the given storage ports.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>, scratch: Arc<dyn ScratchStorage>) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::default())),
            storage,
            scratch,
        }
    }

    /// Initializes the in-memory session from durable storage.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when a persisted record exists but
    /// cannot be read; the store stays logged out in that case.
    pub async fn load(&self) -> Result<(), StorageError> {
        if let Some(persisted) = self.storage.load().await? {
            *self.session.write().await = persisted;
        }
        Ok(())
    }

    /// Snapshot of the current session.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Whether an access token is present.
    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    /// Current access token, empty when logged out.
    pub async fn access_token(&self) -> String {
        self.session.read().await.access_token.clone()
    }

    /// Current refresh token, `None` when none is stored.
    pub async fn refresh_token(&self) -> Option<String> {
        let token = self.session.read().await.refresh_token.clone();
        if token.is_empty() { None } else { Some(token) }
    }

    /// Cached user identity.
    pub async fn user(&self) -> Option<UserProfile> {
        self.session.read().await.user.clone()
    }

    /// Applies an issued token pair and persists the session.
    pub async fn set_tokens(&self, pair: &TokenPair) {
        let snapshot = {
            let mut session = self.session.write().await;
            session.apply_tokens(pair);
            session.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Stores the user identity and persists the session.
    pub async fn set_user(&self, profile: UserProfile) {
        let snapshot = {
            let mut session = self.session.write().await;
            session.user = Some(profile);
            session.clone()
        };
        self.persist(&snapshot).await;
    }

    /// Erases tokens and user identity from memory and durable storage.
    pub async fn logout(&self) {
        self.session.write().await.clear();
        if let Err(error) = self.storage.clear().await {
            tracing::warn!(%error, "failed to clear persisted session");
        }
    }

    async fn persist(&self, session: &Session) {
        if let Err(error) = self.storage.save(session).await {
            // The in-memory session stays authoritative.
            tracing::warn!(%error, "failed to persist session");
        }
    }

    /// Stores the single-use signup token.
    pub async fn set_signup_token(&self, token: ScratchToken) {
        self.scratch.put(SIGNUP_TOKEN_KEY, token).await;
    }

    /// Reads the signup token without consuming it; expired tokens read
    /// as absent and are removed.
    pub async fn peek_signup_token(&self) -> Option<String> {
        self.peek(SIGNUP_TOKEN_KEY).await
    }

    /// Discards the signup token after use.
    pub async fn clear_signup_token(&self) {
        self.scratch.remove(SIGNUP_TOKEN_KEY).await;
    }

    /// Stores the single-use password-reset token.
    pub async fn set_reset_token(&self, token: ScratchToken) {
        self.scratch.put(RESET_TOKEN_KEY, token).await;
    }

    /// Reads the password-reset token without consuming it.
    pub async fn peek_reset_token(&self) -> Option<String> {
        self.peek(RESET_TOKEN_KEY).await
    }

    /// Discards the password-reset token after use.
    pub async fn clear_reset_token(&self) {
        self.scratch.remove(RESET_TOKEN_KEY).await;
    }

    async fn peek(&self, key: &str) -> Option<String> {
        let token = self.scratch.get(key).await?;
        if token.is_expired() {
            self.scratch.remove(key).await;
            return None;
        }
        Some(token.value)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}
