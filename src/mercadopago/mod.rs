//! Mercado Pago integration

pub mod client;
pub mod preference;

pub use client::PreferenceClient;
pub use preference::{BackUrls, PreferenceItem, PreferenceRequest, PreferenceResponse};
