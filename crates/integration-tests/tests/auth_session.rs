//! Integration tests for the OTP login session.

use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use shopfront_client::{AuthError, AuthSession};
use shopfront_integration_tests::{MockBackend, api_client, unused_base_url};

const ISSUED_TOKEN: &str = "tok-1";

fn auth_routes() -> Router {
    Router::new()
        .route(
            "/users/otp",
            post(|| async { Json(json!({ "message": "OTP sent" })) }),
        )
        .route(
            "/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["otp"] == "123456" {
                    (
                        StatusCode::OK,
                        Json(json!({
                            "user": { "name": "Ada", "phoneNumber": body["phoneNumber"] },
                            "token": ISSUED_TOKEN
                        })),
                    )
                } else {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "message": "Invalid OTP" })),
                    )
                }
            }),
        )
        .route(
            "/users/register",
            post(|| async { Json(json!({ "user": { "name": "Grace" } })) }),
        )
        .route(
            "/auth/verify",
            get(|headers: HeaderMap| async move {
                let expected = format!("Bearer {ISSUED_TOKEN}");
                let valid = headers
                    .get(AUTHORIZATION)
                    .and_then(|value| value.to_str().ok())
                    == Some(expected.as_str());
                Json(json!({ "valid": valid, "user": { "name": "Ada" } }))
            }),
        )
        .route(
            "/auth/profile",
            put(|| async { Json(json!({ "user": { "city": "London" } })) }),
        )
}

#[tokio::test]
async fn test_login_stores_token() {
    let backend = MockBackend::start(auth_routes()).await;
    let (client, _) = api_client(&backend.base_url());
    let mut session = AuthSession::new(client.clone());

    session.send_otp("+15550001").await.expect("OTP should send");
    assert_eq!(
        backend.last_request().body,
        Some(json!({ "phoneNumber": "+15550001" }))
    );

    let user = session
        .login("+15550001", "123456")
        .await
        .expect("Login should succeed");
    assert_eq!(user["name"], "Ada");
    assert!(session.is_authenticated());
    assert_eq!(
        client.tokens().get().map(|t| t.expose_secret().to_owned()),
        Some(ISSUED_TOKEN.to_owned())
    );
    assert_eq!(session.user().map(|u| u["name"].clone()), Some(json!("Ada")));
}

#[tokio::test]
async fn test_failed_login_keeps_signed_out() {
    let backend = MockBackend::start(auth_routes()).await;
    let (client, _) = api_client(&backend.base_url());
    let mut session = AuthSession::new(client);

    let err = session
        .login("+15550001", "000000")
        .await
        .expect_err("Wrong OTP should fail");
    assert!(matches!(err, AuthError::Api(_)));
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}

#[tokio::test]
async fn test_signup_without_token_is_rejected() {
    let backend = MockBackend::start(auth_routes()).await;
    let (client, _) = api_client(&backend.base_url());
    let mut session = AuthSession::new(client);

    let err = session
        .signup(&json!({ "name": "Grace", "phoneNumber": "+15550002" }))
        .await
        .expect_err("Signup response lacks a token");
    assert!(matches!(err, AuthError::MissingToken));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_verify_keeps_valid_token() {
    let backend = MockBackend::start(auth_routes()).await;
    let (client, _) = api_client(&backend.base_url());
    client
        .tokens()
        .set(&SecretString::from(ISSUED_TOKEN.to_owned()))
        .expect("Token should be stored");
    let mut session = AuthSession::new(client);

    let user = session.verify().await.expect("Verify should succeed");
    assert_eq!(user.map(|u| u["name"].clone()), Some(json!("Ada")));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_verify_clears_rejected_token() {
    let backend = MockBackend::start(auth_routes()).await;
    let (client, _) = api_client(&backend.base_url());
    client
        .tokens()
        .set(&SecretString::from("forged".to_owned()))
        .expect("Token should be stored");
    let mut session = AuthSession::new(client);

    assert!(session.verify().await.expect("Verify should not error").is_none());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_verify_clears_token_when_backend_unreachable() {
    let (client, _) = api_client(&unused_base_url());
    client
        .tokens()
        .set(&SecretString::from(ISSUED_TOKEN.to_owned()))
        .expect("Token should be stored");
    let mut session = AuthSession::new(client.clone());

    assert!(session.verify().await.expect("Verify should not error").is_none());
    assert!(!session.is_authenticated());
    assert_eq!(
        client.latest_failure().map(|r| r.service_name),
        Some("Authentication Service".to_owned())
    );
}

#[tokio::test]
async fn test_update_profile_merges_user() {
    let backend = MockBackend::start(auth_routes()).await;
    let (client, _) = api_client(&backend.base_url());
    let mut session = AuthSession::new(client);
    session
        .login("+15550001", "123456")
        .await
        .expect("Login should succeed");

    let user = session
        .update_profile(&json!({ "city": "London" }))
        .await
        .expect("Update should succeed")
        .expect("User should be present");
    assert_eq!(user["name"], "Ada");
    assert_eq!(user["city"], "London");

    session.logout().expect("Logout should succeed");
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}
