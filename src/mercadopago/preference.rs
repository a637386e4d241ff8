//! Checkout preference payloads
//!
//! Data shapes submitted to and returned by the Mercado Pago checkout
//! preference API. Currency and redirect targets are fixed; clients only
//! supply the line item fields.

use serde::{Deserialize, Serialize};

/// Currency applied to every line item, regardless of client input
pub const CURRENCY_ID: &str = "MXN";

const SUCCESS_URL: &str = "tuapp://success";
const FAILURE_URL: &str = "tuapp://failure";
const PENDING_URL: &str = "tuapp://pending";
const AUTO_RETURN: &str = "approved";

/// A purchasable line item within a preference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceItem {
    pub title: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub currency_id: String,
}

/// Redirect targets the checkout flow returns the buyer to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

/// Preference descriptor submitted to the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    pub back_urls: BackUrls,
    pub auto_return: String,
}

impl PreferenceRequest {
    /// Build a descriptor with a single line item and the fixed currency,
    /// redirect targets and auto-return flag
    pub fn single_item(title: String, quantity: u32, unit_price: f64) -> Self {
        PreferenceRequest {
            items: vec![PreferenceItem {
                title,
                quantity,
                unit_price,
                currency_id: CURRENCY_ID.to_string(),
            }],
            back_urls: BackUrls {
                success: SUCCESS_URL.to_string(),
                failure: FAILURE_URL.to_string(),
                pending: PENDING_URL.to_string(),
            },
            auto_return: AUTO_RETURN.to_string(),
        }
    }
}

/// Fields of the provider response the backend passes through
///
/// The provider returns far more; everything beyond the identifier and the
/// checkout initiation URL is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceResponse {
    pub id: String,
    pub init_point: String,
}
