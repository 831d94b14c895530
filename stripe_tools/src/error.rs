use thiserror::Error;

#[derive(Debug, Error)]
pub enum StripeApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach the Stripe API: {0}")]
    RequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Stripe rejected the request. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("No such checkout session: {0}")]
    SessionNotFound(String),
    #[error("Invalid checkout request: {0}")]
    InvalidRequest(String),
}
