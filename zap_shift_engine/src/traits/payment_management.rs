use crate::{
    db_types::{NewPayment, Payment},
    traits::{
        data_objects::{PaymentSortField, Sort, UpdateResult},
        StoreError,
    },
    zse_api::payment_objects::{PaymentQueryFilter, PaymentUpdate},
};

/// Typed access to the payment ledger.
#[allow(async_fn_in_trait)]
pub trait PaymentManagement {
    /// Stores a payment record on its own, without touching the parcel it refers to.
    ///
    /// The store guarantees at most one record per transaction id: a duplicate fails with
    /// [`StoreError::PaymentAlreadyExists`], and a reused tracking id with [`StoreError::TrackingIdCollision`].
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, StoreError>;

    async fn fetch_payment(&self, id: i64) -> Result<Option<Payment>, StoreError>;

    async fn find_one_payment(&self, filter: PaymentQueryFilter) -> Result<Option<Payment>, StoreError>;

    async fn find_payments(
        &self,
        filter: PaymentQueryFilter,
        sort: Sort<PaymentSortField>,
    ) -> Result<Vec<Payment>, StoreError>;

    async fn update_payment(&self, id: i64, update: PaymentUpdate) -> Result<UpdateResult, StoreError>;

    /// Fetches the payment recorded for the given provider transaction id, if any.
    async fn fetch_payment_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>, StoreError> {
        self.find_one_payment(PaymentQueryFilter::default().with_transaction_id(transaction_id)).await
    }
}
