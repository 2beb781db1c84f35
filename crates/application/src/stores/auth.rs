//! Authentication flows: login, registration, password reset.
//!
//! Flow errors propagate to the caller; view-layer handling is out of
//! scope here. Session mutation always goes through the shared
//! [`SessionStore`].

use std::sync::Arc;

use ladle_domain::{
    Credentials, DomainError, IssuedToken, RegisterForm, ScratchToken, TokenGrant, UserProfile,
};

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::ports::{ApiRequest, HttpTransport};
use crate::session::SessionStore;

/// Auth flow store over a shared client.
#[derive(Debug)]
pub struct AuthStore<T> {
    client: Arc<ApiClient<T>>,
}

impl<T> Clone for AuthStore<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<T: HttpTransport> AuthStore<T> {
    /// Creates the store over a shared client.
    #[must_use]
    pub fn new(client: Arc<ApiClient<T>>) -> Self {
        Self { client }
    }

    fn session(&self) -> &SessionStore {
        self.client.session()
    }

    /// Logs in and stores tokens plus the normalized user identity.
    ///
    /// # Errors
    ///
    /// Propagates client errors unchanged.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<UserProfile> {
        let grant: TokenGrant = self
            .client
            .send_json(ApiRequest::post("/auth/login").with_body(credentials))
            .await?;

        self.session().set_tokens(&grant.token_pair()).await;
        let profile = grant.profile();
        self.session().set_user(profile.clone()).await;
        tracing::debug!(user_no = profile.user_no, "logged in");
        Ok(profile)
    }

    /// Checks email availability and triggers the verification code.
    ///
    /// # Errors
    ///
    /// Propagates client errors unchanged.
    pub async fn check_email(&self, email: &str) -> ApiResult<()> {
        self.client
            .send(
                ApiRequest::post("/auth/register/check")
                    .with_body(&serde_json::json!({ "email": email })),
            )
            .await?;
        Ok(())
    }

    /// Verifies the emailed code and stores the issued signup token.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when the server issues no token.
    pub async fn verify_signup(&self, email: &str, code: &str) -> ApiResult<IssuedToken> {
        let issued: IssuedToken = self
            .client
            .send_json(
                ApiRequest::post("/auth/register/verify")
                    .with_body(&serde_json::json!({ "email": email, "code": code })),
            )
            .await?;

        let token = issued
            .reset_token
            .clone()
            .ok_or(DomainError::TokenUnavailable("signup"))?;
        self.session()
            .set_signup_token(ScratchToken::new(token, issued.expires_in_sec))
            .await;
        Ok(issued)
    }

    /// Completes registration using the stored signup token, which is
    /// discarded after use.
    ///
    /// # Errors
    ///
    /// Fails fast, before any network call, when the form is invalid or
    /// no signup token is available.
    pub async fn register(&self, form: &RegisterForm) -> ApiResult<()> {
        form.validate()?;
        let token = self
            .session()
            .peek_signup_token()
            .await
            .ok_or(DomainError::TokenUnavailable("signup"))?;

        self.client
            .send(
                ApiRequest::post("/auth/register")
                    .with_header("X-Signup-Token", token)
                    .with_body(form),
            )
            .await?;

        self.session().clear_signup_token().await;
        Ok(())
    }

    /// Requests a password-reset token for the given email.
    ///
    /// # Errors
    ///
    /// Propagates client errors unchanged.
    pub async fn request_password_reset(&self, email: &str) -> ApiResult<IssuedToken> {
        let issued: IssuedToken = self
            .client
            .send_json(
                ApiRequest::post("/auth/password/find")
                    .with_body(&serde_json::json!({ "email": email })),
            )
            .await?;

        if let Some(token) = &issued.reset_token {
            self.session()
                .set_reset_token(ScratchToken::new(token.clone(), issued.expires_in_sec))
                .await;
        }
        Ok(issued)
    }

    /// Verifies the emailed reset code and stores the issued token.
    ///
    /// # Errors
    ///
    /// Fails with a validation error when the server issues no token.
    pub async fn verify_reset_code(&self, email: &str, code: &str) -> ApiResult<IssuedToken> {
        let issued: IssuedToken = self
            .client
            .send_json(
                ApiRequest::post("/auth/password/verify")
                    .with_body(&serde_json::json!({ "email": email, "code": code })),
            )
            .await?;

        let token = issued
            .reset_token
            .clone()
            .ok_or(DomainError::TokenUnavailable("password reset"))?;
        self.session()
            .set_reset_token(ScratchToken::new(token, issued.expires_in_sec))
            .await;
        Ok(issued)
    }

    /// Resets the password. Token precedence: explicit argument, then the
    /// stored reset token. The token is discarded after use.
    ///
    /// # Errors
    ///
    /// Fails fast when no usable token is available or the new password
    /// is empty.
    pub async fn reset_password(
        &self,
        token_override: Option<&str>,
        new_password: &str,
    ) -> ApiResult<()> {
        if new_password.is_empty() {
            return Err(DomainError::MissingField("newPassword").into());
        }

        let token = match token_override {
            Some(explicit) if !explicit.is_empty() => explicit.to_string(),
            _ => self
                .session()
                .peek_reset_token()
                .await
                .ok_or(DomainError::TokenUnavailable("password reset"))?,
        };

        self.client
            .send(ApiRequest::post("/auth/password/reset").with_body(
                &serde_json::json!({ "resetToken": token, "newPassword": new_password }),
            ))
            .await?;

        self.session().clear_reset_token().await;
        Ok(())
    }

    /// Runs the gated refresh protocol.
    pub async fn refresh(&self) -> bool {
        self.client.refresh_session().await
    }

    /// Clears the session in memory and durable storage.
    pub async fn logout(&self) {
        self.session().logout().await;
    }
}
