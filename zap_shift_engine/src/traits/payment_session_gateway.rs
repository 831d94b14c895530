use thiserror::Error;

use crate::zse_api::checkout_objects::{CheckoutSessionRequest, SessionInfo};

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Checkout session {0} does not exist")]
    SessionNotFound(String),
    #[error("The payment provider returned an error: {0}")]
    ProviderError(String),
}

/// An adapter over a hosted-checkout payment provider.
///
/// The engine never talks to a provider directly. The server supplies an implementation (e.g. for Stripe), and tests
/// supply an in-memory one.
#[allow(async_fn_in_trait)]
pub trait PaymentSessionGateway: Clone {
    /// Opens a hosted checkout session and returns the URL the customer should be redirected to.
    async fn create_checkout_session(&self, request: CheckoutSessionRequest) -> Result<String, GatewayError>;

    /// Fetches the provider's current view of a checkout session.
    async fn retrieve_session(&self, session_id: &str) -> Result<SessionInfo, GatewayError>;
}
