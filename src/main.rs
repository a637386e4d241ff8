//! MubClean Payments Backend - Main entry point
//!
//! Backend proxy that creates Mercado Pago payment preferences for the
//! MubClean app, gated by JWT bearer tokens.

mod auth;
mod config;
mod error;
mod mercadopago;
mod middleware;
mod server;

use config::Config;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const BANNER: &str = r#"
╔══════════════════════════════════════════════════════════════╗
║                  MubClean Payments Backend                   ║
║        JWT-gated Mercado Pago preference proxy (Rust)        ║
╚══════════════════════════════════════════════════════════════╝
"#;

fn setup_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}", config.log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

#[tokio::main]
async fn main() {
    // Load a local .env if present; real environments set variables directly
    dotenvy::dotenv().ok();

    let config = Config::parse_args();

    setup_logging(&config);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    if !config.silent {
        eprintln!("{}", BANNER);
        info!("Listen port: {}", config.port());
        info!("Mercado Pago API: {}", config.mercadopago_base_url());
        info!("Allowed origins: {}", config.allowed_origins().join(", "));
        eprintln!();
    }

    if let Err(e) = run(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> error::Result<()> {
    let server_handle = tokio::spawn(server::run_server(config));

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
        result = server_handle => {
            match result {
                Ok(Ok(())) => info!("Server stopped"),
                Ok(Err(e)) => {
                    error!("Server error: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    error!("Server task panicked: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
