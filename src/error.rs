//! Error types for the payments backend

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authorization header missing")]
    AuthenticationRequired,

    #[error("Authorization header carries no token")]
    MalformedCredential,

    #[error("Token verification failed: {0}")]
    InvalidCredential(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Payment provider error: {0}")]
    Provider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BackendError>;

/// Every failure is converted to its HTTP response at the boundary where it
/// is detected; nothing propagates past the router and nothing is retried.
impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        match self {
            BackendError::AuthenticationRequired => {
                tracing::debug!("rejecting request without authorization header");
                (StatusCode::FORBIDDEN, "Access denied: no credentials provided").into_response()
            }
            BackendError::MalformedCredential => {
                tracing::debug!("rejecting request with malformed authorization header");
                (
                    StatusCode::FORBIDDEN,
                    "Access denied: malformed authorization header",
                )
                    .into_response()
            }
            BackendError::InvalidCredential(e) => {
                tracing::debug!("rejecting request with invalid token: {}", e);
                (StatusCode::UNAUTHORIZED, "Invalid or expired token").into_response()
            }
            BackendError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
            other => {
                // Provider details stay in the logs, the client gets a generic message
                tracing::error!("failed to create payment preference: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": "Could not create the payment preference" })),
                )
                    .into_response()
            }
        }
    }
}
