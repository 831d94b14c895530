use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use zap_common::Cents;

use crate::db_types::ParcelId;

/// The payment status a provider reports for a session whose payment has been captured.
pub const PAID_SESSION_STATUS: &str = "paid";

/// A request from a sender to pay for one of their parcels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// The price in major currency units, as quoted to the sender.
    pub cost: f64,
    #[serde(deserialize_with = "parcel_id_from_str_or_int")]
    pub parcel_id: ParcelId,
    pub parcel_name: String,
    #[serde(default)]
    pub sender_email: Option<String>,
}

fn parcel_id_from_str_or_int<'de, D>(deserializer: D) -> Result<ParcelId, D::Error>
where D: Deserializer<'de> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Str(String),
    }
    match RawId::deserialize(deserializer)? {
        RawId::Int(id) => Ok(ParcelId(id)),
        RawId::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// A fully-specified checkout session, in the form a payment provider needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSessionRequest {
    pub amount: Cents,
    pub currency: String,
    pub product_name: String,
    pub customer_email: Option<String>,
    pub parcel_id: ParcelId,
    pub parcel_name: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Where the hosted checkout page sends the customer afterwards, and what currency to charge in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub site_domain: String,
    pub currency: String,
}

impl CheckoutConfig {
    pub fn new<S: Into<String>>(site_domain: S, currency: S) -> Self {
        let site_domain = site_domain.into().trim_end_matches('/').to_string();
        Self { site_domain, currency: currency.into() }
    }

    /// The provider substitutes the real session id for the `{CHECKOUT_SESSION_ID}` placeholder.
    pub fn success_url(&self) -> String {
        format!("{}/dashboard/payment-success?session_id={{CHECKOUT_SESSION_ID}}", self.site_domain)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/dashboard/payment-cancelled", self.site_domain)
    }
}

/// The provider's view of a checkout session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    /// The provider's payment status string, e.g. `paid` or `unpaid`.
    pub payment_status: String,
    /// The provider's transaction (payment intent) id. Absent until the customer has submitted payment.
    pub transaction_id: Option<String>,
    pub amount_total: Option<Cents>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    /// Parcel metadata attached when the session was created.
    pub parcel_id: Option<String>,
    pub parcel_name: Option<String>,
}

impl SessionInfo {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PAID_SESSION_STATUS
    }
}

impl Display for SessionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Session {} ({}) for parcel {}",
            self.session_id,
            self.payment_status,
            self.parcel_id.as_deref().unwrap_or("<none>")
        )
    }
}
