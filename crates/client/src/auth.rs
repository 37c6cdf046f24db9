//! Phone/OTP authentication session.
//!
//! Wraps the auth endpoints and keeps the token slot in step with them:
//! successful login or signup stores the issued token, logout and failed
//! verification remove it.

use secrecy::SecretString;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::storage::StorageError;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend accepted the credentials but sent no token.
    #[error("Login response did not include a token")]
    MissingToken,

    #[error("Failed to update stored token: {0}")]
    Storage(#[from] StorageError),
}

/// The signed-in user, if any, and the operations that change that.
#[derive(Debug, Clone)]
pub struct AuthSession {
    api: ApiClient,
    user: Option<Value>,
}

impl AuthSession {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api, user: None }
    }

    /// Profile returned by the last login, signup or verification.
    #[must_use]
    pub const fn user(&self) -> Option<&Value> {
        self.user.as_ref()
    }

    /// Whether a token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.api.tokens().is_present()
    }

    /// Ask the backend to text a one-time password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` if the request fails.
    pub async fn send_otp(&self, phone_number: &str) -> Result<Value, AuthError> {
        Ok(self
            .api
            .auth()
            .send_otp(&json!({ "phoneNumber": phone_number }))
            .await?)
    }

    /// Log in with a phone number and OTP, storing the issued token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the request fails, the response carries no
    /// token, or the token cannot be stored.
    #[instrument(skip_all)]
    pub async fn login(&mut self, phone_number: &str, otp: &str) -> Result<Value, AuthError> {
        let body = self.api.auth().login(phone_number, otp).await?;
        let user = self.accept(body)?;
        info!("Login successful");
        Ok(user)
    }

    /// Register an account, storing the issued token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the request fails, the response carries no
    /// token, or the token cannot be stored.
    #[instrument(skip_all)]
    pub async fn signup(&mut self, data: &Value) -> Result<Value, AuthError> {
        let body = self.api.auth().signup(data).await?;
        let user = self.accept(body)?;
        info!("Account created");
        Ok(user)
    }

    /// Check the stored token with the backend.
    ///
    /// Returns the user when the token is valid. An invalid token, or any
    /// failure reaching the backend, removes the token and returns `None`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the token cannot be removed.
    pub async fn verify(&mut self) -> Result<Option<Value>, AuthError> {
        let Some(token) = self.api.tokens().get() else {
            self.user = None;
            return Ok(None);
        };

        match self.api.auth().verify_token(token).await {
            Ok(body) if body.get("valid").and_then(Value::as_bool) == Some(true) => {
                self.user = body.get("user").cloned();
                Ok(self.user.clone())
            }
            Ok(_) => {
                warn!("Stored token rejected");
                self.logout()?;
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Token verification failed");
                self.logout()?;
                Ok(None)
            }
        }
    }

    /// Update the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` if the request fails.
    pub async fn update_profile(&mut self, data: &Value) -> Result<Option<Value>, AuthError> {
        let body = self.api.auth().update_profile(data).await?;
        if let Some(updated) = body.get("user").and_then(Value::as_object) {
            let user = self.user.get_or_insert_with(|| json!({}));
            if let Some(current) = user.as_object_mut() {
                current.extend(updated.clone());
            }
        }
        Ok(self.user.clone())
    }

    /// Forget the stored token and user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the token cannot be removed.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.user = None;
        self.api.tokens().clear()?;
        Ok(())
    }

    fn accept(&mut self, mut body: Value) -> Result<Value, AuthError> {
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;
        self.api.tokens().set(&SecretString::from(token.to_owned()))?;

        let user = body.get_mut("user").map(Value::take).unwrap_or(Value::Null);
        self.user = Some(user.clone());
        Ok(user)
    }
}
