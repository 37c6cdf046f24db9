//! Shopfront Core - Shared types library.
//!
//! This crate provides the domain types used across all Shopfront components:
//! - `client` - Cart store, API client and checkout for the storefront backend
//! - `cli` - Command-line access to the cart, auth session and API
//!
//! # Architecture
//!
//! The core crate contains only types and pure calculations - no I/O, no
//! storage, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, cart lines, order statuses and checkout pricing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
