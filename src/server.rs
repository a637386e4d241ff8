//! HTTP server for the payments backend
//!
//! Owns the router, the request-scoped state and the preference handler.
//! The flow per request is validate, translate, delegate, respond; there is
//! no state machine beyond that.

use crate::auth::Claims;
use crate::config::Config;
use crate::error::{BackendError, Result};
use crate::mercadopago::{PreferenceClient, PreferenceRequest};
use crate::middleware;
use axum::extract::State;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub mercadopago: PreferenceClient,
}

impl AppState {
    /// Build the state, wiring the provider client from the configuration
    pub fn from_config(config: Arc<Config>) -> Self {
        let mercadopago = PreferenceClient::new(
            config.mercadopago_base_url(),
            config.mercadopago_access_token.clone(),
        );

        AppState {
            config,
            mercadopago,
        }
    }
}

/// Incoming body for `POST /create_preference`
///
/// Fields are optional and loosely typed on purpose: presence and numeric
/// coercibility are checked by [`CreatePreferenceBody::validate`], which
/// runs before anything touches the provider.
#[derive(Debug, Deserialize)]
pub struct CreatePreferenceBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub quantity: Option<serde_json::Value>,
    #[serde(default)]
    pub unit_price: Option<serde_json::Value>,
}

const MISSING_FIELDS_MSG: &str =
    "Missing product data: title, quantity and unit_price are required and must be positive";

impl CreatePreferenceBody {
    /// Check presence and shape of the product fields, coercing the numeric
    /// ones. Runs before any provider interaction.
    pub fn validate(self) -> Result<(String, u32, f64)> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| BackendError::Validation(MISSING_FIELDS_MSG.to_string()))?;

        let quantity = self
            .quantity
            .as_ref()
            .and_then(coerce_quantity)
            .ok_or_else(|| BackendError::Validation(MISSING_FIELDS_MSG.to_string()))?;

        let unit_price = self
            .unit_price
            .as_ref()
            .and_then(coerce_price)
            .ok_or_else(|| BackendError::Validation(MISSING_FIELDS_MSG.to_string()))?;

        Ok((title, quantity, unit_price))
    }
}

fn coerce_quantity(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => {
            let quantity = n.as_f64()?;
            if quantity > 0.0 && quantity.fract() == 0.0 && quantity <= f64::from(u32::MAX) {
                Some(quantity as u32)
            } else {
                None
            }
        }
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok().filter(|q| *q > 0),
        _ => None,
    }
}

fn coerce_price(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|p| *p > 0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok().filter(|p| *p > 0.0),
        _ => None,
    }
}

/// Body returned to the client on success
#[derive(Debug, Serialize)]
pub struct CreatePreferenceResponse {
    #[serde(rename = "preferenceId")]
    pub preference_id: String,
    pub init_point: String,
}

async fn liveness() -> &'static str {
    "The Mercado Pago backend is up and running!"
}

/// Translate a validated client request into a provider-side preference
/// creation call
async fn create_preference(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CreatePreferenceBody>,
) -> Result<Json<CreatePreferenceResponse>> {
    let (title, quantity, unit_price) = body.validate()?;

    let request = PreferenceRequest::single_item(title, quantity, unit_price);
    let preference = state.mercadopago.create_preference(&request).await?;

    tracing::info!(
        subject = %claims.sub,
        preference_id = %preference.id,
        "preference created"
    );

    Ok(Json(CreatePreferenceResponse {
        preference_id: preference.id,
        init_point: preference.init_point,
    }))
}

fn cors_layer(config: &Config) -> Result<CorsLayer> {
    let mut origins: Vec<HeaderValue> = Vec::new();
    for origin in config.allowed_origins() {
        origins.push(
            origin
                .parse()
                .map_err(|_| BackendError::Config(format!("Invalid allowed origin: {}", origin)))?,
        );
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

/// Build the application router
///
/// Only the preference route sits behind the auth gate; liveness stays open.
pub fn build_router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config)?;

    let protected = Router::new()
        .route("/create_preference", post(create_preference))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Ok(Router::new()
        .route("/", get(liveness))
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state))
}

/// Bind the listener and serve until the task is cancelled or the listener
/// fails
pub async fn run_server(config: Config) -> Result<()> {
    let state = AppState::from_config(Arc::new(config));
    let port = state.config.port();
    let app = build_router(state)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        "Payments backend listening on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;

    Ok(())
}
