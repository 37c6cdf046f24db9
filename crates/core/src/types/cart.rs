//! Cart line types.
//!
//! A [`CartLine`] is one distinct purchasable configuration in the cart. Two
//! add-to-cart calls merge into the same line exactly when their
//! [`LineIdentity`] is equal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{LineId, ProductId};

/// Advisory quantity cap recorded when a product carries no stock figure.
pub const DEFAULT_MAX_QUANTITY: u32 = 10;

/// Largest unit price a cart line may carry (one billion).
///
/// At this bound `unit_price * u32::MAX` is still far inside `Decimal`'s range.
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Whether `price` is usable as a cart unit price: non-negative and at most
/// [`MAX_UNIT_PRICE`].
#[must_use]
pub fn is_valid_unit_price(price: Decimal) -> bool {
    !price.is_sign_negative() && price <= MAX_UNIT_PRICE
}

/// Product data captured at the moment it is added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    /// Units in stock, if the backend reported it.
    #[serde(default)]
    pub stock: Option<u32>,
}

impl ProductSnapshot {
    /// Create a snapshot with no image or stock information.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: None,
            stock: None,
        }
    }

    /// Attach an image reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Attach a stock figure.
    #[must_use]
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }
}

/// Structural identity of a cart line: product plus selected variant.
///
/// Compared field by field, so a color such as `"Black-M"` can never collide
/// with a different size/color split.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineIdentity {
    pub product_id: ProductId,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl LineIdentity {
    #[must_use]
    pub fn new(product_id: ProductId, size: Option<&str>, color: Option<&str>) -> Self {
        Self {
            product_id,
            size: size.map(str::to_owned),
            color: color.map(str::to_owned),
        }
    }
}

/// One row in the cart.
///
/// The field names match the persisted JSON record
/// `{lineId, productId, name, unitPrice, imageRef, size, color, quantity, maxQuantity}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub line_id: LineId,
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time the line was added (not live-synced).
    pub unit_price: Decimal,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub quantity: u32,
    /// Advisory upper bound; never enforced.
    #[serde(default = "default_max_quantity")]
    pub max_quantity: u32,
}

const fn default_max_quantity() -> u32 {
    DEFAULT_MAX_QUANTITY
}

impl CartLine {
    /// Create a new line for `product` with a freshly generated line ID.
    #[must_use]
    pub fn from_product(
        product: &ProductSnapshot,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Self {
        Self {
            line_id: LineId::generate(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            image_ref: product.image.clone(),
            size: size.map(str::to_owned),
            color: color.map(str::to_owned),
            quantity,
            max_quantity: product.stock.unwrap_or(DEFAULT_MAX_QUANTITY),
        }
    }

    /// The identity this line occupies in the cart.
    #[must_use]
    pub fn identity(&self) -> LineIdentity {
        LineIdentity::new(
            self.product_id.clone(),
            self.size.as_deref(),
            self.color.as_deref(),
        )
    }

    /// Whether this line has the given identity, without allocating.
    #[must_use]
    pub fn matches(&self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> bool {
        &self.product_id == product_id && self.size.as_deref() == size && self.color.as_deref() == color
    }

    /// Exact `unit_price * quantity`, unrounded. Saturates at `Decimal::MAX`.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or(Decimal::MAX)
    }

    /// Whether the unit price is within the accepted range.
    #[must_use]
    pub fn has_valid_price(&self) -> bool {
        is_valid_unit_price(self.unit_price)
    }

    #[must_use]
    pub const fn max_quantity(&self) -> u32 {
        self.max_quantity
    }

    /// Whether the quantity has grown past the stock hint recorded at add time.
    #[must_use]
    pub const fn exceeds_stock_hint(&self) -> bool {
        self.quantity > self.max_quantity
    }
}
