//! Stripe Checkout as a [`PaymentSessionGateway`].
//!
//! The parcel id and name are stored in the session metadata under [`PARCEL_ID_KEY`] and [`PARCEL_NAME_KEY`], so that
//! reconciliation can find the parcel from the session alone.
use log::*;
use stripe_tools::{CheckoutSession, NewCheckoutSession, StripeApi, StripeApiError, StripeConfig};
use zap_common::Cents;
use zap_shift_engine::{
    checkout_objects::{CheckoutSessionRequest, SessionInfo},
    GatewayError,
    PaymentSessionGateway,
};

pub const PARCEL_ID_KEY: &str = "parcelId";
pub const PARCEL_NAME_KEY: &str = "parcelName";

#[derive(Clone)]
pub struct StripeGateway {
    api: StripeApi,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let api = StripeApi::new(config)?;
        Ok(Self { api })
    }
}

impl PaymentSessionGateway for StripeGateway {
    async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<String, GatewayError> {
        let parcel_id = request.parcel_id;
        let session = self.api.create_checkout_session(&new_checkout_session(request)).await.map_err(gateway_error)?;
        let url = session.url.ok_or_else(|| {
            error!("💳️ Stripe created session {} for parcel {parcel_id} without a checkout URL", session.id);
            GatewayError::ProviderError(format!("Session {} has no checkout URL", session.id))
        })?;
        debug!("💳️ Stripe session {} created for parcel {parcel_id}", session.id);
        Ok(url)
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionInfo, GatewayError> {
        let session = self.api.retrieve_checkout_session(session_id).await.map_err(gateway_error)?;
        Ok(session_info(session))
    }
}

pub fn new_checkout_session(request: CheckoutSessionRequest) -> NewCheckoutSession {
    NewCheckoutSession {
        unit_amount: request.amount.value(),
        currency: request.currency,
        product_name: request.product_name,
        customer_email: request.customer_email,
        success_url: request.success_url,
        cancel_url: request.cancel_url,
        metadata: vec![
            (PARCEL_ID_KEY.to_string(), request.parcel_id.to_string()),
            (PARCEL_NAME_KEY.to_string(), request.parcel_name),
        ],
    }
}

/// Stripe's view of a session. The payment intent id is the transaction id: it is permanent, whereas the session
/// expires.
pub fn session_info(session: CheckoutSession) -> SessionInfo {
    let customer_email = session.email().map(str::to_string);
    let CheckoutSession { id, payment_status, amount_total, currency, mut metadata, payment_intent, .. } = session;
    SessionInfo {
        session_id: id,
        payment_status,
        transaction_id: payment_intent,
        amount_total: amount_total.map(Cents::from),
        currency,
        customer_email,
        parcel_id: metadata.remove(PARCEL_ID_KEY),
        parcel_name: metadata.remove(PARCEL_NAME_KEY),
    }
}

pub fn gateway_error(e: StripeApiError) -> GatewayError {
    match e {
        StripeApiError::SessionNotFound(id) => GatewayError::SessionNotFound(id),
        StripeApiError::InvalidRequest(s) => GatewayError::InvalidRequest(s),
        StripeApiError::QueryError { status, message } if (400..500).contains(&status) && status != 429 => {
            GatewayError::InvalidRequest(message)
        },
        e => GatewayError::ProviderError(e.to_string()),
    }
}
