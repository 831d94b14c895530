use serde::{Deserialize, Serialize};

use crate::db_types::{ParcelId, Payment};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PaymentQueryFilter {
    pub customer_email: Option<String>,
    pub transaction_id: Option<String>,
    pub parcel_id: Option<ParcelId>,
    pub tracking_id: Option<String>,
}

impl PaymentQueryFilter {
    pub fn with_customer_email<S: Into<String>>(mut self, email: S) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    pub fn with_transaction_id<S: Into<String>>(mut self, transaction_id: S) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    pub fn with_parcel_id(mut self, parcel_id: ParcelId) -> Self {
        self.parcel_id = Some(parcel_id);
        self
    }

    pub fn with_tracking_id<S: Into<String>>(mut self, tracking_id: S) -> Self {
        self.tracking_id = Some(tracking_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.customer_email.is_none()
            && self.transaction_id.is_none()
            && self.parcel_id.is_none()
            && self.tracking_id.is_none()
    }
}

/// A partial update to a payment record. The reconciliation flow never modifies a payment once it has been written;
/// this exists for administrative corrections, such as recording a refund reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentUpdate {
    pub payment_status: Option<String>,
}

impl PaymentUpdate {
    pub fn with_payment_status<S: Into<String>>(mut self, status: S) -> Self {
        self.payment_status = Some(status.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.payment_status.is_none()
    }

    pub fn changes(&self, payment: &Payment) -> bool {
        self.payment_status.as_ref().is_some_and(|s| s != &payment.payment_status)
    }
}
