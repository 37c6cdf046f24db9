//! Integration tests for order placement.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde_json::json;
use shopfront_client::{
    ApiConfig, CartStore, CheckoutError, ClientConfig, ClientState, KeyValueStore, MemoryStore,
    place_order,
};
use shopfront_core::{PricingPolicy, ProductSnapshot, ShippingAddress, ShippingMethod};
use shopfront_integration_tests::MockBackend;

fn address() -> ShippingAddress {
    ShippingAddress {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        address: "12 St James's Square".to_owned(),
        apartment: None,
        city: "London".to_owned(),
        state: "LDN".to_owned(),
        zip_code: "SW1Y 4JH".to_owned(),
        country: "GB".to_owned(),
        phone: "5550001".to_owned(),
    }
}

fn state_for(backend: &MockBackend) -> (ClientState, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::new());
    let config = ClientConfig {
        api: ApiConfig::new(backend.base_url()),
        data_dir: std::env::temp_dir(),
        pricing: PricingPolicy::default(),
    };
    let state = ClientState::with_storage(config, storage.clone() as Arc<dyn KeyValueStore>)
        .expect("State should build");
    (state, storage)
}

fn fill(cart: &mut CartStore) {
    let tee = ProductSnapshot::new("P1", "Tee", Decimal::new(2000, 2));
    let mug = ProductSnapshot::new("P2", "Mug", Decimal::new(1250, 2)).with_stock(4);
    cart.add_item(&tee, 2, Some("M"), Some("Black"))
        .expect("Add should succeed");
    cart.add_item(&mug, 1, None, None)
        .expect("Add should succeed");
}

#[tokio::test]
async fn test_successful_order_clears_cart() {
    let backend = MockBackend::start(Router::new().route(
        "/orders",
        post(|| async { (StatusCode::CREATED, Json(json!({ "_id": "ORD-9" }))) }),
    ))
    .await;
    let (state, _) = state_for(&backend);
    let mut cart = state.cart();
    fill(&mut cart);

    let placed = place_order(
        state.api(),
        &mut cart,
        address(),
        ShippingMethod::Standard,
        state.pricing(),
    )
    .await
    .expect("Order should be placed");

    assert_eq!(placed.order_id.map(|id| id.to_string()), Some("ORD-9".to_owned()));
    // 52.50 subtotal ships free; tax 4.20
    assert_eq!(placed.summary.shipping, Decimal::ZERO);
    assert_eq!(placed.summary.tax, Decimal::new(420, 2));
    assert_eq!(placed.summary.total, Decimal::new(5670, 2));

    assert!(cart.is_empty());
    assert!(state.cart().is_empty());

    let body = backend.last_request().body.expect("Order body should be JSON");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["items"][0]["selectedSize"], "M");
    assert_eq!(body["shippingAddress"]["zipCode"], "SW1Y 4JH");
    assert_eq!(body["shippingMethod"], "standard");
}

#[tokio::test]
async fn test_failed_order_keeps_cart() {
    let backend = MockBackend::start(Router::new().route(
        "/orders",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    ))
    .await;
    let (state, _) = state_for(&backend);
    let mut cart = state.cart();
    fill(&mut cart);

    let err = place_order(
        state.api(),
        &mut cart,
        address(),
        ShippingMethod::Express,
        state.pricing(),
    )
    .await
    .expect_err("Order should fail");
    assert!(matches!(err, CheckoutError::Api(_)));

    assert_eq!(cart.item_count(), 3);
    assert_eq!(state.cart().item_count(), 3);
    let record = state.api().latest_failure().expect("Failure should be recorded");
    assert_eq!(record.service_name, "Order Management Service");
    assert_eq!(record.status, Some(500));
}

#[tokio::test]
async fn test_empty_cart_is_not_submitted() {
    let backend = MockBackend::start(Router::new()).await;
    let (state, _) = state_for(&backend);
    let mut cart = state.cart();

    let err = place_order(
        state.api(),
        &mut cart,
        address(),
        ShippingMethod::Standard,
        state.pricing(),
    )
    .await
    .expect_err("Empty cart should be rejected");
    assert!(matches!(err, CheckoutError::EmptyCart));
    assert!(backend.requests().is_empty());
}
