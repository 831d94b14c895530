use crate::{
    db_types::{NewPayment, Parcel, Payment},
    traits::{data_objects::RecordedPayment, ParcelManagement, PaymentManagement, StoreError},
};

/// The highest level of behaviour a backend must provide to support payment reconciliation.
///
/// Implementations must make [`record_payment_for_parcel`](Self::record_payment_for_parcel) atomic. The unique index on
/// the transaction id is what makes reconciliation safe under concurrent and replayed requests, so it must be
/// enforced inside the same atomic unit as the parcel update.
#[allow(async_fn_in_trait)]
pub trait ReconciliationDatabase: Clone + ParcelManagement + PaymentManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Takes a new payment and, in a single atomic transaction,
    /// * inserts the payment record. If a record for the same transaction id already exists, the transaction is rolled
    ///   back and [`StoreError::PaymentAlreadyExists`] is returned.
    /// * marks the referenced parcel as paid and stamps it with the payment's tracking id.
    ///
    /// A parcel that is already paid is left untouched (`matched_count: 1, modified_count: 0`). A parcel that does not
    /// exist is reported as `matched_count: 0`, but the payment is still recorded, since the money has moved.
    async fn record_payment_for_parcel(&self, payment: NewPayment) -> Result<RecordedPayment, StoreError>;
}

/// Cross-checks between the parcel and payment collections.
#[allow(async_fn_in_trait)]
pub trait AuditManagement {
    /// Parcels marked as paid for which no payment record exists.
    async fn fetch_paid_parcels_without_payment(&self) -> Result<Vec<Parcel>, StoreError>;

    /// Payment records whose parcel is missing or not marked as paid.
    async fn fetch_payments_without_paid_parcel(&self) -> Result<Vec<Payment>, StoreError>;
}
