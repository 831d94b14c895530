use std::fmt::Debug;

use log::*;
use zap_common::Cents;

use crate::{
    traits::{GatewayError, PaymentSessionGateway},
    zse_api::checkout_objects::{CheckoutConfig, CheckoutRequest, CheckoutSessionRequest},
};

/// `CheckoutApi` opens hosted checkout sessions for parcels.
///
/// The sender's quoted price arrives in major units (e.g. `25.99`). It is converted to minor units, rounding to the
/// nearest cent, and validated before the provider is ever contacted.
pub struct CheckoutApi<G> {
    gateway: G,
    config: CheckoutConfig,
}

impl<G> Debug for CheckoutApi<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi ({})", self.config.site_domain)
    }
}

impl<G> CheckoutApi<G>
where G: PaymentSessionGateway
{
    pub fn new(gateway: G, config: CheckoutConfig) -> Self {
        Self { gateway, config }
    }

    /// Opens a checkout session for the parcel and returns the URL of the hosted payment page.
    pub async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<String, GatewayError> {
        let amount = Cents::from_major_units(request.cost).map_err(|e| {
            debug!("💳️ Rejecting checkout for parcel {}. {e}", request.parcel_id);
            GatewayError::InvalidAmount(e.to_string())
        })?;
        let parcel_name = request.parcel_name.trim();
        if parcel_name.is_empty() {
            return Err(GatewayError::InvalidRequest("A parcel name is required".to_string()));
        }
        let session = CheckoutSessionRequest {
            amount,
            currency: self.config.currency.clone(),
            product_name: format!("Please pay for: {parcel_name}"),
            customer_email: request.sender_email.filter(|e| !e.trim().is_empty()),
            parcel_id: request.parcel_id,
            parcel_name: parcel_name.to_string(),
            success_url: self.config.success_url(),
            cancel_url: self.config.cancel_url(),
        };
        let url = self.gateway.create_checkout_session(session).await?;
        info!("💳️ Checkout session opened for parcel {} ({amount} {})", request.parcel_id, self.config.currency);
        Ok(url)
    }
}
