//! Cart commands.

use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use shopfront_client::{CartStore, ClientState, checkout};
use shopfront_core::{CartLine, LineId, Price, ProductId, ProductSnapshot, ShippingMethod};

use super::CommandError;

/// Arguments for `sf cart add`.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Product ID
    pub product_id: String,

    #[arg(short, long, default_value_t = 1)]
    pub quantity: u32,

    #[arg(short, long)]
    pub size: Option<String>,

    #[arg(short, long)]
    pub color: Option<String>,

    /// Product name (skips the backend lookup together with --price)
    #[arg(long, requires = "price")]
    pub name: Option<String>,

    /// Unit price (skips the backend lookup together with --name)
    #[arg(long, requires = "name")]
    pub price: Option<Decimal>,

    /// Units in stock
    #[arg(long)]
    pub stock: Option<u32>,
}

/// Print every line.
#[allow(clippy::print_stdout)]
pub fn list(state: &ClientState) {
    let cart = state.cart();
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }

    for line in cart.lines() {
        print_line(line);
    }
    println!();
    println!(
        "{} items, total {}",
        cart.item_count(),
        cart.total_price()
    );
}

/// Add a product, fetching its details from the backend unless given.
#[allow(clippy::print_stdout)]
pub async fn add(state: &ClientState, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let product = match (args.name, args.price) {
        (Some(name), Some(price)) => {
            let mut product = ProductSnapshot::new(args.product_id.as_str(), name, price);
            product.stock = args.stock;
            product
        }
        _ => {
            let id = ProductId::new(args.product_id.as_str());
            let body = state.api().products().get(&id).await?;
            let mut product = snapshot_from_json(&id, &body)?;
            if args.stock.is_some() {
                product.stock = args.stock;
            }
            product
        }
    };

    let mut cart = state.cart();
    let line = cart.add_item(
        &product,
        args.quantity,
        args.size.as_deref(),
        args.color.as_deref(),
    )?;

    println!("{} added to cart", product.name);
    print_line(&line);
    if line.exceeds_stock_hint() {
        println!(
            "note: quantity {} is above the {} in stock",
            line.quantity,
            line.max_quantity()
        );
    }
    Ok(())
}

/// Set a line's quantity.
#[allow(clippy::print_stdout)]
pub fn update(state: &ClientState, line: &str, quantity: u32) -> Result<(), CommandError> {
    let mut cart = state.cart();
    let line_id = resolve_line(&cart, line)?;
    cart.update_quantity(line_id, quantity);
    if quantity == 0 {
        println!("Item removed from cart");
    } else {
        println!("Quantity set to {quantity}");
    }
    Ok(())
}

/// Remove a line.
#[allow(clippy::print_stdout)]
pub fn remove(state: &ClientState, line: &str) -> Result<(), CommandError> {
    let mut cart = state.cart();
    let line_id = resolve_line(&cart, line)?;
    cart.remove_item(line_id);
    println!("Item removed from cart");
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn clear(state: &ClientState) {
    state.cart().clear();
    println!("Cart cleared");
}

/// Print checkout totals for the cart.
#[allow(clippy::print_stdout)]
pub fn summary(state: &ClientState, method: ShippingMethod) {
    let cart = state.cart();
    let policy = state.pricing();
    let summary = checkout::summarize(&cart, method, policy);

    println!("Subtotal  {:>10}", Price::usd(summary.subtotal).display());
    println!(
        "Shipping  {:>10}  ({}, {})",
        Price::usd(summary.shipping).display(),
        method.label(),
        method.delivery_estimate()
    );
    println!("Tax       {:>10}", Price::usd(summary.tax).display());
    println!("Total     {:>10}", Price::usd(summary.total).display());

    if let Some(missing) = policy.amount_to_free_shipping(cart.total()) {
        println!(
            "Add {} more for free standard shipping",
            Price::usd(missing).display()
        );
    }
}

#[allow(clippy::print_stdout)]
fn print_line(line: &CartLine) {
    let variant = [line.size.as_deref(), line.color.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("/");
    println!(
        "{}  {:<30} {:<12} x{:<3} {:>10} {:>10}",
        short_id(line.line_id),
        line.name,
        variant,
        line.quantity,
        Price::usd(line.unit_price).display(),
        Price::usd(line.line_total()).display(),
    );
}

fn short_id(id: LineId) -> String {
    id.to_string().chars().take(8).collect()
}

/// Accept a full line ID or a unique prefix of one.
fn resolve_line(cart: &CartStore, input: &str) -> Result<LineId, CommandError> {
    if let Ok(id) = input.parse::<LineId>() {
        return Ok(id);
    }

    let mut matches = cart
        .lines()
        .iter()
        .filter(|line| line.line_id.to_string().starts_with(input));
    match (matches.next(), matches.next()) {
        (Some(line), None) if !input.is_empty() => Ok(line.line_id),
        (Some(_), Some(_)) => Err(CommandError::AmbiguousLine(input.to_owned())),
        _ => Err(CommandError::UnknownLine(input.to_owned())),
    }
}

/// Build a cart snapshot from a backend product record.
///
/// Accepts either the product itself or `{ "product": {...} }`.
fn snapshot_from_json(id: &ProductId, body: &Value) -> Result<ProductSnapshot, CommandError> {
    let product = body.get("product").unwrap_or(body);

    let name = product
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| CommandError::IncompleteProduct(id.to_string(), "name"))?;

    let price = match product.get("price") {
        Some(Value::Number(n)) => n.to_string().parse::<Decimal>().ok(),
        Some(Value::String(s)) => s.parse::<Decimal>().ok(),
        _ => None,
    }
    .ok_or_else(|| CommandError::IncompleteProduct(id.to_string(), "price"))?;

    let image = product
        .get("images")
        .and_then(|images| images.get(0))
        .or_else(|| product.get("image"))
        .and_then(Value::as_str);

    let mut snapshot = ProductSnapshot::new(id.clone(), name, price);
    snapshot.image = image.map(str::to_owned);
    snapshot.stock = product
        .get("stock")
        .and_then(Value::as_u64)
        .filter(|stock| *stock > 0)
        .and_then(|stock| u32::try_from(stock).ok());
    Ok(snapshot)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use shopfront_client::MemoryStore;

    use super::*;

    #[test]
    fn test_snapshot_from_json() {
        let id = ProductId::new("42");
        let body = json!({
            "_id": "42",
            "name": "Linen Shirt",
            "price": 39.5,
            "images": ["/img/shirt.jpg"],
            "stock": 3
        });
        let snapshot = snapshot_from_json(&id, &body).unwrap();
        assert_eq!(snapshot.name, "Linen Shirt");
        assert_eq!(snapshot.price, Decimal::new(395, 1));
        assert_eq!(snapshot.image.as_deref(), Some("/img/shirt.jpg"));
        assert_eq!(snapshot.stock, Some(3));
    }

    #[test]
    fn test_snapshot_zero_stock_uses_default_cap() {
        let id = ProductId::new("7");
        let body = json!({ "product": { "name": "Cap", "price": "12.00", "stock": 0 } });
        let snapshot = snapshot_from_json(&id, &body).unwrap();
        assert_eq!(snapshot.stock, None);
        assert!(snapshot_from_json(&id, &json!({ "name": "Cap" })).is_err());
    }

    #[test]
    fn test_resolve_line_by_prefix() {
        let mut cart = CartStore::load(Arc::new(MemoryStore::new()));
        let line = cart
            .add_item(&ProductSnapshot::new("P1", "Tee", Decimal::ONE), 1, None, None)
            .unwrap();

        let full = line.line_id.to_string();
        assert_eq!(resolve_line(&cart, &full).unwrap(), line.line_id);
        assert_eq!(resolve_line(&cart, &full[..8]).unwrap(), line.line_id);
        assert!(matches!(
            resolve_line(&cart, "zzzz"),
            Err(CommandError::UnknownLine(_))
        ));
        assert!(resolve_line(&cart, "").is_err());
    }
}
