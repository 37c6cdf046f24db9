//! CLI command implementations.

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;

use thiserror::Error;

/// Errors raised by command argument handling.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No cart line matches the given ID or prefix.
    #[error("No cart line matches {0}")]
    UnknownLine(String),

    /// More than one cart line starts with the given prefix.
    #[error("Line prefix {0} is ambiguous")]
    AmbiguousLine(String),

    /// Query parameter was not `key=value`.
    #[error("Invalid query parameter {0:?} (expected key=value)")]
    InvalidQuery(String),

    /// Backend product record lacks a field needed for the cart.
    #[error("Product {0} is missing {1}")]
    IncompleteProduct(String, &'static str),
}
