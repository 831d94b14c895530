use thiserror::Error;

use crate::db_types::{NewPayment, ParcelId};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("Cannot insert payment, since it already exists with transaction id {0}")]
    PaymentAlreadyExists(String),
    #[error("Tracking id {0} has already been issued")]
    TrackingIdCollision(String),
    #[error("A user with email {0} already exists")]
    UserAlreadyExists(String),
    #[error("The requested parcel {0} does not exist")]
    ParcelNotFound(ParcelId),
    #[error("The parcel update is not allowed. {0}")]
    InvalidParcelUpdate(String),
    #[error("The requested update would result in a no-op.")]
    UpdateNoOp,
    #[error("User error constructing query: {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

impl StoreError {
    /// Maps a failed payment insert onto the unique constraint it violated, if any.
    ///
    /// SQLite reports the offending column in the message (`UNIQUE constraint failed: payments.tracking_id`), which is
    /// how a tracking id collision is told apart from a duplicate transaction id.
    pub(crate) fn from_payment_insert(e: sqlx::Error, payment: &NewPayment) -> Self {
        match e {
            sqlx::Error::Database(err) if err.is_unique_violation() => {
                if err.message().contains("tracking_id") {
                    StoreError::TrackingIdCollision(payment.tracking_id.clone())
                } else {
                    StoreError::PaymentAlreadyExists(payment.transaction_id.clone())
                }
            },
            _ => StoreError::from(e),
        }
    }
}
