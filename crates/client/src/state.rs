//! Client state shared by the commands of one session.

use std::sync::Arc;

use shopfront_core::PricingPolicy;

use crate::api::ApiClient;
use crate::auth::AuthSession;
use crate::cart::CartStore;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::storage::{FileStore, KeyValueStore};
use crate::token::TokenStore;

/// Everything a storefront session needs, built once from configuration.
///
/// Cheaply cloneable via `Arc`. The cart is not held here: it has a single
/// owner, so [`ClientState::cart`] loads a fresh [`CartStore`] over the same
/// storage.
#[derive(Clone)]
pub struct ClientState {
    inner: Arc<ClientStateInner>,
}

struct ClientStateInner {
    config: ClientConfig,
    storage: Arc<dyn KeyValueStore>,
    api: ApiClient,
}

impl std::fmt::Debug for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientState")
            .field("config", &self.inner.config)
            .field("api", &self.inner.api)
            .finish_non_exhaustive()
    }
}

impl ClientState {
    /// Open the data directory and build the API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the HTTP
    /// client fails to build.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.data_dir)?);
        Self::with_storage(config, storage)
    }

    /// Build state over an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn with_storage(config: ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let api = ApiClient::new(&config.api, TokenStore::new(storage.clone()))?;
        Ok(Self {
            inner: Arc::new(ClientStateInner {
                config,
                storage,
                api,
            }),
        })
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Get a reference to the pricing policy.
    #[must_use]
    pub fn pricing(&self) -> &PricingPolicy {
        &self.inner.config.pricing
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Load the persisted cart.
    #[must_use]
    pub fn cart(&self) -> CartStore {
        CartStore::load(self.inner.storage.clone())
    }

    /// Start an auth session on the shared API client.
    #[must_use]
    pub fn auth(&self) -> AuthSession {
        AuthSession::new(self.inner.api.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopfront_core::ProductSnapshot;

    use super::*;
    use crate::config::ApiConfig;

    fn config(dir: &std::path::Path) -> ClientConfig {
        ClientConfig {
            api: ApiConfig::new("http://127.0.0.1:9/api"),
            data_dir: dir.to_path_buf(),
            pricing: PricingPolicy::default(),
        }
    }

    #[test]
    fn test_cart_shared_through_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let state = ClientState::new(config(dir.path())).unwrap();

        let mut cart = state.cart();
        cart.add_item(&ProductSnapshot::new("P1", "Tee", Decimal::ONE), 2, None, None)
            .unwrap();

        let reopened = ClientState::new(config(dir.path())).unwrap();
        assert_eq!(reopened.cart().item_count(), 2);
        assert_eq!(reopened.api().base_url(), "http://127.0.0.1:9/api");
    }

    #[test]
    fn test_auth_uses_shared_token_slot() {
        let dir = tempfile::tempdir().unwrap();
        let state = ClientState::new(config(dir.path())).unwrap();
        assert!(!state.auth().is_authenticated());

        state
            .api()
            .tokens()
            .set(&secrecy::SecretString::from("t".to_owned()))
            .unwrap();
        assert!(state.auth().is_authenticated());
        assert!(dir.path().join("token.json").exists());
    }
}
