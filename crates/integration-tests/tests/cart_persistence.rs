//! Integration tests for the cart's file-backed persistence.

use std::fs;
use std::sync::Arc;

use rust_decimal::Decimal;
use shopfront_client::{CART_KEY, CartStore, FileStore, KeyValueStore};
use shopfront_core::{ProductId, ProductSnapshot};

fn open(dir: &std::path::Path) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::open(dir).expect("Store should open"))
}

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().expect("Temp dir should be created");
    let tee = ProductSnapshot::new("P1", "Tee", Decimal::new(1999, 2)).with_image("/tee.jpg");

    {
        let mut cart = CartStore::load(open(dir.path()));
        cart.add_item(&tee, 1, Some("M"), None).expect("Add should succeed");
        cart.add_item(&tee, 1, Some("L"), None).expect("Add should succeed");
        cart.add_item(&tee, 2, Some("M"), None).expect("Add should succeed");
    }

    let cart = CartStore::load(open(dir.path()));
    assert_eq!(cart.line_count(), 2);
    assert_eq!(cart.item_count(), 4);
    let medium = cart
        .find_line(&ProductId::new("P1"), Some("M"), None)
        .expect("Medium line should persist");
    assert_eq!(medium.quantity, 3);
    assert_eq!(medium.image_ref.as_deref(), Some("/tee.jpg"));
}

#[test]
fn test_persisted_format_is_camel_case_json() {
    let dir = tempfile::tempdir().expect("Temp dir should be created");
    let mut cart = CartStore::load(open(dir.path()));
    cart.add_item(
        &ProductSnapshot::new("P1", "Tee", Decimal::new(1999, 2)),
        1,
        None,
        Some("Red"),
    )
    .expect("Add should succeed");

    let raw = fs::read_to_string(dir.path().join(format!("{CART_KEY}.json")))
        .expect("Cart file should exist");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("Cart file should be JSON");
    let line = &value[0];
    assert_eq!(line["productId"], "P1");
    assert_eq!(line["color"], "Red");
    assert_eq!(line["quantity"], 1);
    assert_eq!(line["maxQuantity"], 10);
    assert!(line["lineId"].is_string());
}

#[test]
fn test_corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().expect("Temp dir should be created");
    fs::write(dir.path().join(format!("{CART_KEY}.json")), "not json")
        .expect("Write should succeed");

    let cart = CartStore::load(open(dir.path()));
    assert!(cart.is_empty());
    assert_eq!(cart.total(), Decimal::ZERO);
}
