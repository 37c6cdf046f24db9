//! Unified error type for callers that drive several client components.
//!
//! Each module keeps its own error enum; this wraps them so a binary can use
//! `?` across cart, auth, checkout and API calls with one return type.

use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Top-level error for the Shopfront client.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration was missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A cart operation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// A backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Order placement failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),
}

impl Error {
    /// Whether the error means the user must sign in again.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Api(ApiError::Unauthorized { .. })
                | Self::Auth(AuthError::Api(ApiError::Unauthorized { .. }))
                | Self::Checkout(CheckoutError::Api(ApiError::Unauthorized { .. }))
        )
    }
}

/// Result alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unauthorized() {
        let err: Error = CheckoutError::Api(ApiError::Unauthorized {
            body: String::new(),
        })
        .into();
        assert!(err.is_unauthorized());

        let err: Error = CartError::InvalidQuantity(0).into();
        assert!(!err.is_unauthorized());
    }
}
