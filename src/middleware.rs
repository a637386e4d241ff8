//! HTTP middleware gating protected routes behind bearer tokens
//!
//! Extracts the `Authorization` header, verifies the token against the shared
//! secret and attaches the decoded claims to the request before the handler
//! runs. Requests without a verifiable credential never reach the handler.

use crate::auth::{self, Claims};
use crate::error::BackendError;
use crate::server::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

/// Admit or reject a request based on its bearer credential
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let header = match req.headers().get(AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| BackendError::MalformedCredential)?,
        ),
        None => None,
    };

    let token = auth::extract_bearer(header)?;
    let claims: Claims = auth::verify_token(token, &state.config.secret_key)?;

    debug!(subject = %claims.sub, "bearer token verified");

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
