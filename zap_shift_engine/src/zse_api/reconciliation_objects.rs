use serde::{Deserialize, Serialize};

use crate::{db_types::Payment, traits::UpdateResult};

/// What a reconciliation call did.
///
/// Replaying a session that has already been reconciled always produces [`ReconciliationResult::AlreadyRecorded`]
/// with the tracking id that was issued the first time, no matter how many times or how concurrently it is replayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReconciliationResult {
    /// This call wrote the payment record (and, if the parcel exists and was unpaid, marked it as paid).
    Recorded { parcel_update: UpdateResult, payment: Payment },
    /// A payment record for this transaction already exists. Nothing was written.
    AlreadyRecorded { tracking_id: String, transaction_id: String },
    /// The provider does not (yet) report the session as paid. Nothing was written.
    NotPaid,
}

impl ReconciliationResult {
    pub fn tracking_id(&self) -> Option<&str> {
        match self {
            ReconciliationResult::Recorded { payment, .. } => Some(payment.tracking_id.as_str()),
            ReconciliationResult::AlreadyRecorded { tracking_id, .. } => Some(tracking_id.as_str()),
            ReconciliationResult::NotPaid => None,
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, ReconciliationResult::Recorded { .. })
    }
}

impl From<Payment> for ReconciliationResult {
    fn from(existing: Payment) -> Self {
        ReconciliationResult::AlreadyRecorded {
            tracking_id: existing.tracking_id,
            transaction_id: existing.transaction_id,
        }
    }
}
