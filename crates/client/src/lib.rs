//! Shopfront client library.
//!
//! A storefront client for a REST e-commerce backend:
//!
//! - [`cart`] - Persistent cart with identity-based line merging
//! - [`api`] - Authenticated HTTP client with failure classification and
//!   session invalidation, plus typed endpoint groups
//! - [`auth`] - Phone/OTP login session over the token slot
//! - [`checkout`] - Order summary and submission
//! - [`storage`] - Key-value slots (file and in-memory backends)
//! - [`config`] - Environment configuration
//! - [`state`] - Wiring of the above for one session

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod token;

pub use api::{ApiClient, ApiError, ApiResponse, RequestOptions, ServiceCallRecord, ServiceEvent};
pub use auth::{AuthError, AuthSession};
pub use cart::{CART_KEY, CartError, CartStore};
pub use checkout::{CheckoutError, OrderRequest, PlacedOrder, place_order, summarize};
pub use config::{ApiConfig, ClientConfig, ConfigError};
pub use error::{Error, Result};
pub use state::ClientState;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use token::{TOKEN_KEY, TokenStore};
