//! Bearer token parsing and verification
//!
//! The verification primitive is kept free of HTTP types so it can be tested
//! without a running server; the middleware wires it into the request path.

use crate::error::{BackendError, Result};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Decoded payload of a verified bearer token
///
/// Attached to the request extensions after verification and dropped with
/// the request; never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject the token was issued to
    pub sub: String,
    /// Expiry as a Unix timestamp
    pub exp: u64,
}

/// Extract the token segment from an `Authorization` header value.
///
/// A missing header and a header without a token segment are distinct
/// failures so callers can tell "no credential supplied" from "credential
/// present but unparsable".
pub fn extract_bearer(header: Option<&str>) -> Result<&str> {
    let header = header.ok_or(BackendError::AuthenticationRequired)?;

    // "Bearer <token>" split on whitespace; anything without a second
    // segment carries no token
    header
        .split_whitespace()
        .nth(1)
        .ok_or(BackendError::MalformedCredential)
}

/// Verify a token's signature and expiry against the shared secret.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}
