//! # Checkout Configuration
//!
//! Stores deployment configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`VITRINE_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};
use vitrine_core::{DeliveryArea, PricingRules};

/// Store identity and messaging-channel endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingConfig {
    /// Store name (rendered in the order message header)
    pub store_name: String,

    /// WhatsApp number receiving orders, digits only with country code
    pub whatsapp_number: String,

    /// Base URL of the messaging channel's click-to-chat endpoint
    pub channel_base: String,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        BrandingConfig {
            store_name: "Vitrine Carioca".to_string(),
            whatsapp_number: "5521999990000".to_string(),
            channel_base: "https://wa.me/".to_string(),
        }
    }
}

/// Checkout configuration.
///
/// ## Fields
/// All fields have the live storefront's values as defaults; alternate
/// deployments override them through the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutConfig {
    pub branding: BrandingConfig,

    /// Where the store delivers (fixed city/state + CEP prefixes)
    pub area: DeliveryArea,

    /// Shipping and discount rules
    pub rules: PricingRules,

    /// Pause between accepting the order and opening the channel, so
    /// the storefront can show its "processing" state
    pub submit_delay_ms: u64,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            branding: BrandingConfig::default(),
            area: DeliveryArea::default(),
            rules: PricingRules::default(),
            submit_delay_ms: 1_000,
        }
    }
}

impl CheckoutConfig {
    /// Creates a configuration from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `VITRINE_STORE_NAME`: Override store name
    /// - `VITRINE_WHATSAPP`: Override the order-receiving number
    /// - `VITRINE_CHANNEL_BASE`: Override the click-to-chat base URL
    /// - `VITRINE_SUBMIT_DELAY_MS`: Override the processing pause
    pub fn from_env() -> Self {
        let mut config = CheckoutConfig::default();

        if let Ok(store_name) = std::env::var("VITRINE_STORE_NAME") {
            config.branding.store_name = store_name;
        }

        if let Ok(number) = std::env::var("VITRINE_WHATSAPP") {
            config.branding.whatsapp_number = number;
        }

        if let Ok(base) = std::env::var("VITRINE_CHANNEL_BASE") {
            config.branding.channel_base = base;
        }

        if let Ok(delay_str) = std::env::var("VITRINE_SUBMIT_DELAY_MS") {
            if let Ok(delay) = delay_str.parse::<u64>() {
                config.submit_delay_ms = delay;
            }
        }

        config
    }
}
