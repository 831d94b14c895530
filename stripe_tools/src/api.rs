use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client,
    Response,
    StatusCode,
};
use serde::de::DeserializeOwned;

use crate::{
    config::StripeConfig,
    data_objects::{CheckoutSession, NewCheckoutSession, StripeErrorResponse},
    StripeApiError,
};

#[derive(Clone)]
pub struct StripeApi {
    config: StripeConfig,
    client: Arc<Client>,
}

impl StripeApi {
    pub fn new(config: StripeConfig) -> Result<Self, StripeApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        let bearer = format!("Bearer {}", config.secret_key.reveal());
        let mut val = HeaderValue::from_str(&bearer).map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| StripeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/v1{path}", self.config.api_url)
    }

    /// Creates a hosted checkout session and returns it. The customer should be redirected to `session.url`.
    pub async fn create_checkout_session(&self, session: &NewCheckoutSession) -> Result<CheckoutSession, StripeApiError> {
        if session.unit_amount <= 0 {
            return Err(StripeApiError::InvalidRequest(format!("unit amount must be positive: {}", session.unit_amount)));
        }
        let url = self.url("/checkout/sessions");
        trace!("Creating checkout session: {url}");
        let response = self
            .client
            .post(url)
            .form(&session.to_form_params())
            .send()
            .await
            .map_err(|e| StripeApiError::RequestError(e.to_string()))?;
        let result = parse_response::<CheckoutSession>(response).await?;
        info!("Created checkout session {} for {} {}", result.id, session.unit_amount, session.currency);
        Ok(result)
    }

    /// Fetches the current state of a checkout session. An unknown id produces [`StripeApiError::SessionNotFound`].
    pub async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSession, StripeApiError> {
        if !is_valid_session_id(session_id) {
            return Err(StripeApiError::InvalidRequest(format!("'{session_id}' is not a valid session id")));
        }
        let url = self.url(&format!("/checkout/sessions/{session_id}"));
        trace!("Retrieving checkout session: {url}");
        let response =
            self.client.get(url).send().await.map_err(|e| StripeApiError::RequestError(e.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Checkout session {session_id} does not exist");
            return Err(StripeApiError::SessionNotFound(session_id.to_string()));
        }
        let session = parse_response::<CheckoutSession>(response).await?;
        debug!("Retrieved checkout session {}. Payment status: {}", session.id, session.payment_status);
        Ok(session)
    }
}

/// Stripe object ids only use ASCII letters, digits and underscores. Anything else could change the request path.
fn is_valid_session_id(session_id: &str) -> bool {
    !session_id.is_empty() && session_id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, StripeApiError> {
    let status = response.status();
    if status.is_success() {
        trace!("Stripe query successful. {status}");
        return response.json::<T>().await.map_err(|e| StripeApiError::JsonError(e.to_string()));
    }
    let text = response.text().await.map_err(|e| StripeApiError::RequestError(e.to_string()))?;
    let message = serde_json::from_str::<StripeErrorResponse>(&text)
        .ok()
        .and_then(|r| r.error.message)
        .unwrap_or(text);
    warn!("Stripe returned {status}: {message}");
    Err(StripeApiError::QueryError { status: status.as_u16(), message })
}
