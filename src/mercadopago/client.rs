//! HTTP client for the Mercado Pago checkout preference API

use super::preference::{PreferenceRequest, PreferenceResponse};
use crate::error::{BackendError, Result};

/// Client for creating checkout preferences
///
/// Holds the provider credential and base URL; cheap to clone, the inner
/// `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct PreferenceClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl PreferenceClient {
    /// Create a new client against the given API base URL
    pub fn new(base_url: String, access_token: String) -> Self {
        PreferenceClient {
            http: reqwest::Client::new(),
            base_url,
            access_token,
        }
    }

    /// Create a checkout preference.
    ///
    /// Single synchronous round trip with no timeout: the caller waits until
    /// the provider answers or the connection fails. Failures are surfaced
    /// once; nothing is retried.
    pub async fn create_preference(
        &self,
        request: &PreferenceRequest,
    ) -> Result<PreferenceResponse> {
        let url = format!(
            "{}/checkout/preferences",
            self.base_url.trim_end_matches('/')
        );

        tracing::debug!("creating preference at {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Provider(format!(
                "preference creation failed with status {}: {}",
                status, body
            )));
        }

        let preference: PreferenceResponse = response.json().await.map_err(|e| {
            BackendError::Provider(format!("failed to parse preference response: {}", e))
        })?;

        Ok(preference)
    }
}
