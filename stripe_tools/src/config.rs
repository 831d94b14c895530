use std::time::Duration;

use log::*;
use zap_common::{helpers::env_or_default, Secret};

pub const DEFAULT_STRIPE_API_URL: &str = "https://api.stripe.com";
pub const DEFAULT_STRIPE_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Base URL of the Stripe API, without a trailing slash. Overridable so that tests can point at a stub server.
    pub api_url: String,
    pub secret_key: Secret<String>,
    pub timeout: Duration,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_STRIPE_API_URL.to_string(),
            secret_key: Secret::default(),
            timeout: Duration::from_millis(DEFAULT_STRIPE_TIMEOUT_MS),
        }
    }
}

impl StripeConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("ZAP_STRIPE_API_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_STRIPE_API_URL.to_string());
        let secret_key = Secret::new(std::env::var("ZAP_STRIPE_SECRET_KEY").unwrap_or_else(|_| {
            warn!("ZAP_STRIPE_SECRET_KEY not set. Every call to Stripe is going to fail.");
            String::default()
        }));
        let timeout = Duration::from_millis(env_or_default("ZAP_STRIPE_TIMEOUT_MS", DEFAULT_STRIPE_TIMEOUT_MS));
        Self { api_url, secret_key, timeout }
    }
}
