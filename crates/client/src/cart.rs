//! Persistent shopping cart.
//!
//! [`CartStore`] owns the cart lines for one shopper. Every mutation rewrites
//! the `cart` slot of the backing [`KeyValueStore`] before returning, so a
//! restart (or another handle opened on the same directory) sees the same
//! cart. Storage problems never fail a cart operation: the in-memory lines
//! stay authoritative and the failure is logged.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use shopfront_core::{
    CartLine, LineId, LineIdentity, Price, ProductId, ProductSnapshot, is_valid_unit_price,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::storage::KeyValueStore;

/// Slot name holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Errors returned by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(u32),

    #[error("unit price must be between 0 and 1000000000 (got {0})")]
    InvalidPrice(Decimal),
}

/// The shopper's cart, mirrored to durable storage.
pub struct CartStore {
    lines: Vec<CartLine>,
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart from the default `cart` slot.
    ///
    /// A missing or unreadable payload yields an empty cart.
    #[must_use]
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::load_from(storage, CART_KEY)
    }

    /// Load the cart from a named slot.
    #[must_use]
    pub fn load_from(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let lines = read_lines(storage.as_ref(), &key);
        debug!(key = %key, lines = lines.len(), "Cart loaded");
        Self {
            lines,
            storage,
            key,
        }
    }

    /// Re-read the persisted slot, replacing the in-memory lines.
    ///
    /// Picks up writes made by other handles on the same storage.
    pub fn reload(&mut self) {
        self.lines = read_lines(self.storage.as_ref(), &self.key);
    }

    /// Add `quantity` units of a product variant.
    ///
    /// If a line with the same product, size and color exists its quantity is
    /// incremented (without clamping to the stock hint); otherwise a new line
    /// is created. Returns the resulting line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity` is zero, or
    /// `CartError::InvalidPrice` if the product price is negative or above
    /// [`shopfront_core::MAX_UNIT_PRICE`].
    pub fn add_item(
        &mut self,
        product: &ProductSnapshot,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Result<CartLine, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if !is_valid_unit_price(product.price) {
            return Err(CartError::InvalidPrice(product.price));
        }

        let line = if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|line| line.matches(&product.id, size, color))
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
            existing.clone()
        } else {
            let line = CartLine::from_product(product, quantity, size, color);
            self.lines.push(line.clone());
            line
        };

        info!(
            product_id = %product.id,
            line_id = %line.line_id,
            quantity = line.quantity,
            "Added to cart"
        );
        self.persist();
        Ok(line)
    }

    /// Set the quantity of a line. Zero removes it.
    ///
    /// Returns `false` if no line has `line_id`.
    pub fn update_quantity(&mut self, line_id: LineId, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_item(line_id);
        }

        let Some(line) = self.lines.iter_mut().find(|line| line.line_id == line_id) else {
            debug!(%line_id, "Quantity update for unknown line ignored");
            return false;
        };
        line.quantity = quantity;
        self.persist();
        true
    }

    /// Remove a line. Removing an unknown line is a no-op returning `false`.
    pub fn remove_item(&mut self, line_id: LineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.line_id != line_id);
        let removed = self.lines.len() < before;
        if removed {
            debug!(%line_id, "Removed from cart");
        }
        self.persist();
        removed
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    /// Exact sum of `unit_price * quantity` over all lines. Saturates at
    /// `Decimal::MAX`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// The cart total as a displayable USD price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::usd(self.total())
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Find the line for a product variant.
    #[must_use]
    pub fn find_line(
        &self,
        product_id: &ProductId,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Option<&CartLine> {
        self.lines
            .iter()
            .find(|line| line.matches(product_id, size, color))
    }

    #[must_use]
    pub fn is_in_cart(&self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> bool {
        self.find_line(product_id, size, color).is_some()
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, line_id: LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.line_id == line_id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.lines) {
            Ok(payload) => payload,
            Err(e) => {
                error!(key = %self.key, error = %e, "Failed to serialize cart");
                return;
            }
        };
        if let Err(e) = self.storage.set(&self.key, &payload) {
            error!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }
}

/// Read and normalize the persisted lines.
///
/// Lines with quantity 0 or an out-of-range unit price are dropped and lines
/// sharing an identity are merged into the first occurrence.
fn read_lines(storage: &dyn KeyValueStore, key: &str) -> Vec<CartLine> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read cart, starting empty");
            return Vec::new();
        }
    };

    let stored: Vec<CartLine> = match serde_json::from_str(&raw) {
        Ok(lines) => lines,
        Err(e) => {
            warn!(key, error = %e, "Corrupt cart payload, starting empty");
            return Vec::new();
        }
    };

    let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
    let mut positions: HashMap<LineIdentity, usize> = HashMap::new();
    for line in stored.into_iter().filter(|line| line.quantity > 0) {
        if !line.has_valid_price() {
            warn!(
                key,
                line_id = %line.line_id,
                unit_price = %line.unit_price,
                "Dropping cart line with out-of-range price"
            );
            continue;
        }
        if let Some(merged) = positions
            .get(&line.identity())
            .and_then(|&index| lines.get_mut(index))
        {
            merged.quantity = merged.quantity.saturating_add(line.quantity);
        } else {
            positions.insert(line.identity(), lines.len());
            lines.push(line);
        }
    }
    lines
}
