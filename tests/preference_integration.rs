//! Integration tests for the preference flow
//!
//! Exercises validation, the provider call and response reshaping against a
//! mocked Mercado Pago API.

use std::net::SocketAddr;
use std::sync::Arc;

use jsonwebtoken::{encode, EncodingKey, Header};
use mubclean_payments_rs::auth::Claims;
use mubclean_payments_rs::config::Config;
use mubclean_payments_rs::server::{build_router, AppState};

const TEST_SECRET: &str = "integration-test-secret";
const TEST_ACCESS_TOKEN: &str = "TEST-access-token";

/// Spin up the backend on an ephemeral port, pointed at the given provider URL
async fn spawn_app(provider_url: &str) -> SocketAddr {
    let config = Config {
        secret_key: TEST_SECRET.to_string(),
        mercadopago_access_token: TEST_ACCESS_TOKEN.to_string(),
        mercadopago_base_url: Some(provider_url.to_string()),
        port: None,
        allowed_origins: None,
        silent: true,
        debug: false,
    };

    let state = AppState::from_config(Arc::new(config));
    let app = build_router(state).expect("router should build");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });

    addr
}

fn bearer_token() -> String {
    let claims = Claims {
        sub: "user-1".to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as u64,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("token encoding should not fail");

    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_preference_created_and_passed_through() {
    let mut provider = mockito::Server::new_async().await;
    let provider_mock = provider
        .mock("POST", "/checkout/preferences")
        .match_header("authorization", format!("Bearer {}", TEST_ACCESS_TOKEN).as_str())
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "items": [{
                "title": "Wash",
                "quantity": 1,
                "unit_price": 150.0,
                "currency_id": "MXN"
            }],
            "auto_return": "approved"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "id": "123456789-abc",
                "init_point": "https://www.mercadopago.com.mx/checkout/v1/redirect?pref_id=123456789-abc",
                "sandbox_init_point": "https://sandbox.mercadopago.com.mx/checkout"
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let addr = spawn_app(&provider.url()).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/create_preference", addr))
        .header("Authorization", bearer_token())
        .json(&serde_json::json!({ "title": "Wash", "quantity": 1, "unit_price": 150 }))
        .send()
        .await
        .expect("request should complete");

    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("json body");
    assert_eq!(body["preferenceId"], "123456789-abc");
    assert_eq!(
        body["init_point"],
        "https://www.mercadopago.com.mx/checkout/v1/redirect?pref_id=123456789-abc"
    );

    provider_mock.assert_async().await;
}

#[tokio::test]
async fn test_currency_is_fixed_and_numeric_strings_coerced() {
    let mut provider = mockito::Server::new_async().await;
    let provider_mock = provider
        .mock("POST", "/checkout/preferences")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "items": [{
                "quantity": 3,
                "unit_price": 49.5,
                "currency_id": "MXN"
            }]
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({ "id": "pref-2", "init_point": "https://checkout.example/2" })
                .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let addr = spawn_app(&provider.url()).await;

    // The client tries to pick its own currency; the backend ignores it
    let response = reqwest::Client::new()
        .post(format!("http://{}/create_preference", addr))
        .header("Authorization", bearer_token())
        .json(&serde_json::json!({
            "title": "Deep clean",
            "quantity": "3",
            "unit_price": "49.5",
            "currency_id": "USD"
        }))
        .send()
        .await
        .expect("request should complete");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    provider_mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_fields_are_400_without_provider_call() {
    let mut provider = mockito::Server::new_async().await;
    let provider_mock = provider
        .mock("POST", "/checkout/preferences")
        .expect(0)
        .create_async()
        .await;

    let addr = spawn_app(&provider.url()).await;
    let client = reqwest::Client::new();

    for body in [
        serde_json::json!({ "title": "Wash" }),
        serde_json::json!({ "quantity": 1, "unit_price": 150 }),
        serde_json::json!({ "title": "Wash", "quantity": 0, "unit_price": 150 }),
        serde_json::json!({}),
    ] {
        let response = client
            .post(format!("http://{}/create_preference", addr))
            .header("Authorization", bearer_token())
            .json(&body)
            .send()
            .await
            .expect("request should complete");

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json().await.expect("json body");
        assert!(body["error"].is_string());
    }

    provider_mock.assert_async().await;
}

#[tokio::test]
async fn test_provider_failure_is_500_with_generic_message() {
    let mut provider = mockito::Server::new_async().await;
    let provider_mock = provider
        .mock("POST", "/checkout/preferences")
        .with_status(500)
        .with_body("upstream exploded: internal details")
        .expect(1)
        .create_async()
        .await;

    let addr = spawn_app(&provider.url()).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/create_preference", addr))
        .header("Authorization", bearer_token())
        .json(&serde_json::json!({ "title": "Wash", "quantity": 1, "unit_price": 150 }))
        .send()
        .await
        .expect("request should complete");

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json().await.expect("json body");
    let message = body["error"].as_str().expect("error message");
    assert!(!message.contains("internal details"));

    // Surfaced once; .expect(1) above also proves no retry happened
    provider_mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_provider_body_is_500() {
    let mut provider = mockito::Server::new_async().await;
    let provider_mock = provider
        .mock("POST", "/checkout/preferences")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{\"unexpected\": true}")
        .expect(1)
        .create_async()
        .await;

    let addr = spawn_app(&provider.url()).await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/create_preference", addr))
        .header("Authorization", bearer_token())
        .json(&serde_json::json!({ "title": "Wash", "quantity": 1, "unit_price": 150 }))
        .send()
        .await
        .expect("request should complete");

    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    provider_mock.assert_async().await;
}
