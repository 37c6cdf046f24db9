//! Bearer token slot.

use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::warn;

use crate::storage::{KeyValueStore, StorageError};

/// Slot name holding the auth token.
pub const TOKEN_KEY: &str = "token";

/// Reads and writes the opaque bearer token issued at login.
///
/// The slot holds the token as a JSON string, like every other slot.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("key", &self.key)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl TokenStore {
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            key: TOKEN_KEY.to_owned(),
        }
    }

    /// The stored token, if any. Unreadable storage or a malformed slot
    /// counts as signed out.
    #[must_use]
    pub fn get(&self) -> Option<SecretString> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read auth token");
                return None;
            }
        };
        match serde_json::from_str::<String>(&raw) {
            Ok(token) if !token.trim().is_empty() => Some(SecretString::from(token)),
            Ok(_) => None,
            Err(_) => {
                warn!(key = %self.key, "Malformed auth token slot ignored");
                None
            }
        }
    }

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written.
    pub fn set(&self, token: &SecretString) -> Result<(), StorageError> {
        let encoded = serde_json::Value::from(token.expose_secret()).to_string();
        self.storage.set(&self.key, &encoded)
    }

    /// Forget the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key)
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }
}
