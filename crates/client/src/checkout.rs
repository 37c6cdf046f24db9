//! Order placement from the current cart.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use shopfront_core::{
    CartLine, OrderId, OrderSummary, PricingPolicy, ProductId, ShippingAddress, ShippingMethod,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError};
use crate::cart::CartStore;

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cannot place an order for an empty cart")]
    EmptyCart,

    #[error("Order submission failed: {0}")]
    Api(#[from] ApiError),

    #[error("Failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One purchased line as the orders endpoint expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product: ProductId,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub selected_size: Option<String>,
    pub selected_color: Option<String>,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product: line.product_id.clone(),
            quantity: line.quantity,
            price: line.unit_price,
            selected_size: line.size.clone(),
            selected_color: line.color.clone(),
        }
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub shipping_method: ShippingMethod,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl OrderRequest {
    /// Build the request for the cart's current lines.
    #[must_use]
    pub fn new(
        lines: &[CartLine],
        address: ShippingAddress,
        method: ShippingMethod,
        summary: &OrderSummary,
    ) -> Self {
        Self {
            items: lines.iter().map(OrderItem::from).collect(),
            shipping_address: address,
            shipping_method: method,
            subtotal: summary.subtotal,
            shipping: summary.shipping,
            tax: summary.tax,
            total: summary.total,
        }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedOrder {
    /// Identifier assigned by the backend, when it returned one.
    pub order_id: Option<OrderId>,
    pub summary: OrderSummary,
    pub response: Value,
}

/// Totals for the cart with the chosen shipping method.
#[must_use]
pub fn summarize(cart: &CartStore, method: ShippingMethod, policy: &PricingPolicy) -> OrderSummary {
    OrderSummary::compute(cart.total(), method, policy)
}

/// Submit the cart as an order.
///
/// The cart is cleared only after the backend accepts the order. On any
/// failure it is left untouched so the shopper can retry.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` for an empty cart, or the API error
/// if submission fails.
#[instrument(skip_all, fields(method = %method, lines = cart.line_count()))]
pub async fn place_order(
    api: &ApiClient,
    cart: &mut CartStore,
    address: ShippingAddress,
    method: ShippingMethod,
    policy: &PricingPolicy,
) -> Result<PlacedOrder, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let summary = summarize(cart, method, policy);
    let request = OrderRequest::new(cart.lines(), address, method, &summary);
    let payload = serde_json::to_value(&request)?;

    let response = match api.orders().create(&payload).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Order rejected, cart kept");
            return Err(e.into());
        }
    };

    cart.clear();
    let order_id = extract_order_id(&response);
    info!(
        order_id = order_id.as_ref().map(OrderId::as_str),
        total = %summary.total,
        "Order placed"
    );

    Ok(PlacedOrder {
        order_id,
        summary,
        response,
    })
}

/// Pull the order identifier out of a create-order response.
fn extract_order_id(response: &Value) -> Option<OrderId> {
    std::iter::once(response).chain(response.get("order")).find_map(|value| {
        ["_id", "id", "orderId"]
            .iter()
            .find_map(|key| match value.get(key)? {
                Value::String(s) if !s.is_empty() => Some(OrderId::new(s.as_str())),
                Value::Number(n) => Some(OrderId::new(n.to_string())),
                _ => None,
            })
    })
}
