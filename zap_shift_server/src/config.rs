use std::{env, time::Duration};

use log::*;
use stripe_tools::StripeConfig;
use zap_common::{
    helpers::{env_flag, env_or_default},
    Secret,
    DEFAULT_CURRENCY_CODE,
};
use zap_shift_engine::checkout_objects::CheckoutConfig;

const DEFAULT_ZAP_HOST: &str = "127.0.0.1";
const DEFAULT_ZAP_PORT: u16 = 5000;
const DEFAULT_SITE_DOMAIN: &str = "http://localhost:5173";
const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_AUDIT_INTERVAL_MINS: u64 = 10;
const DEFAULT_IDENTITY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The public URL of the front end. Checkout success and cancel pages hang off this.
    pub site_domain: String,
    /// The currency parcels are charged in, as a lowercase ISO code.
    pub currency: String,
    pub stripe: StripeConfig,
    pub identity: IdentityConfig,
    /// How often the audit worker cross-checks parcels against the payment ledger.
    pub audit_interval: Duration,
    pub audit_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_ZAP_HOST.to_string(),
            port: DEFAULT_ZAP_PORT,
            database_url: String::default(),
            site_domain: DEFAULT_SITE_DOMAIN.to_string(),
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            stripe: StripeConfig::default(),
            identity: IdentityConfig::default(),
            audit_interval: Duration::from_secs(DEFAULT_AUDIT_INTERVAL_MINS * 60),
            audit_enabled: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("ZAP_HOST").ok().unwrap_or_else(|| DEFAULT_ZAP_HOST.into());
        let port = env::var("ZAP_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for ZAP_PORT. {e} Using the default, {DEFAULT_ZAP_PORT}, instead."
                    );
                    DEFAULT_ZAP_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_ZAP_PORT);
        let database_url = env::var("ZAP_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ ZAP_DATABASE_URL is not set. Please set it to the URL for the Zap Shift database.");
            String::default()
        });
        let site_domain = env::var("ZAP_SITE_DOMAIN").ok().unwrap_or_else(|| {
            warn!(
                "🪛️ ZAP_SITE_DOMAIN is not set. Customers will be sent back to {DEFAULT_SITE_DOMAIN} after checkout."
            );
            DEFAULT_SITE_DOMAIN.to_string()
        });
        let currency = env::var("ZAP_CURRENCY")
            .map(|s| s.trim().to_lowercase())
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string());
        let audit_mins = env_or_default("ZAP_AUDIT_INTERVAL_MINS", DEFAULT_AUDIT_INTERVAL_MINS).max(1);
        let audit_enabled = env_flag("ZAP_AUDIT_ENABLED", true);
        Self {
            host,
            port,
            database_url,
            site_domain,
            currency,
            stripe: StripeConfig::new_from_env_or_default(),
            identity: IdentityConfig::from_env_or_default(),
            audit_interval: Duration::from_secs(audit_mins * 60),
            audit_enabled,
        }
    }

    pub fn checkout_config(&self) -> CheckoutConfig {
        CheckoutConfig::new(self.site_domain.as_str(), self.currency.as_str())
    }
}

//-------------------------------------------------  IdentityConfig  ---------------------------------------------------
/// Where bearer credentials are verified. The identity provider exchanges an id token for the account it belongs to.
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub api_url: String,
    pub api_key: Secret<String>,
    pub timeout: Duration,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self { api_url: DEFAULT_IDENTITY_URL.to_string(), api_key: Secret::default(), timeout: DEFAULT_IDENTITY_TIMEOUT }
    }
}

impl IdentityConfig {
    pub fn from_env_or_default() -> Self {
        let api_url = env::var("ZAP_IDENTITY_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_IDENTITY_URL.to_string());
        let api_key = Secret::new(env::var("ZAP_IDENTITY_API_KEY").unwrap_or_else(|_| {
            error!(
                "🪛️ ZAP_IDENTITY_API_KEY is not set. No bearer credential can be verified, so every authenticated \
                 request will be refused."
            );
            String::default()
        }));
        Self { api_url, api_key, ..Default::default() }
    }
}
