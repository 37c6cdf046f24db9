//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod checkout;
pub mod id;
pub mod price;
pub mod status;

pub use cart::{
    CartLine, DEFAULT_MAX_QUANTITY, LineIdentity, MAX_UNIT_PRICE, ProductSnapshot, is_valid_unit_price,
};
pub use checkout::{
    OrderSummary, ParseShippingMethodError, PricingPolicy, ShippingAddress, ShippingMethod,
};
pub use id::*;
pub use price::{CurrencyCode, Price, round_cents};
pub use status::*;
