//! Configuration parsing and validation

use crate::error::{BackendError, Result};
use clap::Parser;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MERCADOPAGO_BASE_URL: &str = "https://api.mercadopago.com";
const DEFAULT_ALLOWED_ORIGINS: &str = "https://mubclean-web2.vercel.app,http://localhost:4200";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "mubclean-payments-rs",
    version,
    about = "MubClean payments backend",
    long_about = "Backend proxy that creates Mercado Pago payment preferences for the MubClean app, gated by JWT bearer tokens"
)]
pub struct Config {
    /// Shared secret used to verify bearer tokens (HS256)
    #[arg(long, env = "SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// Mercado Pago access token used for preference creation
    #[arg(long, env = "MERCADOPAGO_ACCESS_TOKEN", hide_env_values = true)]
    pub mercadopago_access_token: String,

    /// Mercado Pago API base URL (default: https://api.mercadopago.com)
    #[arg(long, env = "MERCADOPAGO_BASE_URL")]
    pub mercadopago_base_url: Option<String>,

    /// Port to listen on (default: 3000)
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Comma-separated list of origins allowed by CORS
    #[arg(long, env = "ALLOWED_ORIGINS")]
    pub allowed_origins: Option<String>,

    /// Show only error messages
    #[arg(long, conflicts_with = "debug")]
    pub silent: bool,

    /// Enable debug logging
    #[arg(long, env = "PAYMENTS_DEBUG")]
    pub debug: bool,
}

impl Config {
    /// Parse configuration from CLI arguments and environment variables
    pub fn parse_args() -> Self {
        Config::parse()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.secret_key.is_empty() {
            return Err(BackendError::Config(
                "Token signing secret is required".to_string(),
            ));
        }

        if self.mercadopago_access_token.is_empty() {
            return Err(BackendError::Config(
                "Mercado Pago access token is required".to_string(),
            ));
        }

        if let Some(ref base_url) = self.mercadopago_base_url {
            url::Url::parse(base_url)
                .map_err(|e| BackendError::Config(format!("Invalid Mercado Pago base URL: {}", e)))?;
        }

        for origin in self.allowed_origins() {
            url::Url::parse(&origin)
                .map_err(|e| BackendError::Config(format!("Invalid allowed origin {}: {}", origin, e)))?;
        }

        Ok(())
    }

    /// Get the Mercado Pago API base URL (with default)
    pub fn mercadopago_base_url(&self) -> String {
        self.mercadopago_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_MERCADOPAGO_BASE_URL.to_string())
    }

    /// Get the listen port (with default)
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Get the CORS allow-list as origins (with defaults)
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_deref()
            .unwrap_or(DEFAULT_ALLOWED_ORIGINS)
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Get log level based on flags
    pub fn log_level(&self) -> tracing::Level {
        if self.silent {
            tracing::Level::ERROR
        } else if self.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
