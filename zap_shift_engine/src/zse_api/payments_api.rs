use std::fmt::Debug;

use log::*;

use crate::{
    db_types::Payment,
    traits::{
        data_objects::{PaymentSortField, Sort},
        PaymentManagement,
    },
    zse_api::{errors::PaymentsApiError, payment_objects::PaymentQueryFilter},
};

/// `PaymentsApi` provides read access to the payment ledger.
pub struct PaymentsApi<B> {
    db: B,
}

impl<B: Debug> Debug for PaymentsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentsApi ({:?})", self.db)
    }
}

impl<B> PaymentsApi<B>
where B: PaymentManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches payment history, most recent first.
    ///
    /// If `requested_email` is given, it must match `verified_email` (the identity the caller authenticated as), or the
    /// request is refused with [`PaymentsApiError::Forbidden`].
    pub async fn payment_history(
        &self,
        requested_email: Option<&str>,
        verified_email: &str,
    ) -> Result<Vec<Payment>, PaymentsApiError> {
        let filter = match requested_email {
            Some(requested) if requested != verified_email => {
                warn!("💰️ {verified_email} tried to read the payment history of {requested}. Denied.");
                return Err(PaymentsApiError::Forbidden {
                    requested: requested.to_string(),
                    verified: verified_email.to_string(),
                });
            },
            Some(requested) => PaymentQueryFilter::default().with_customer_email(requested),
            None => PaymentQueryFilter::default(),
        };
        let payments = self.db.find_payments(filter, Sort::descending(PaymentSortField::PaidAt)).await?;
        trace!("💰️ Found {} payments", payments.len());
        Ok(payments)
    }

    pub async fn payment_for_transaction(&self, transaction_id: &str) -> Result<Option<Payment>, PaymentsApiError> {
        Ok(self.db.fetch_payment_by_transaction_id(transaction_id).await?)
    }
}
