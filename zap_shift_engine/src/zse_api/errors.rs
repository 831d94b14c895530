use thiserror::Error;

use crate::traits::{GatewayError, StoreError};

#[derive(Debug, Clone, Error)]
pub enum ReconciliationError {
    #[error("A checkout session id is required")]
    MissingSessionId,
    #[error("{0}")]
    Gateway(#[from] GatewayError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("Paid session {session_id} cannot be matched to a parcel. {reason}")]
    InvalidSessionMetadata { session_id: String, reason: String },
    #[error("Could not issue a unique tracking id after {0} attempts")]
    TrackingIdExhausted(usize),
}

#[derive(Debug, Clone, Error)]
pub enum ParcelApiError {
    #[error("Invalid parcel: {0}")]
    InvalidParcel(String),
    #[error("{0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Error)]
pub enum PaymentsApiError {
    #[error("Payment history for {requested} was requested by {verified}")]
    Forbidden { requested: String, verified: String },
    #[error("{0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Error)]
pub enum UserApiError {
    #[error("Invalid user: {0}")]
    InvalidUser(String),
    #[error("{0}")]
    Store(#[from] StoreError),
}
