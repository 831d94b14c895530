use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Parcel, Payment},
    traits::{AuditManagement, AuditReport, StoreError},
};

/// `AuditApi` looks for parcels and payments that disagree with each other.
///
/// Reconciliation writes both in one atomic unit, so a healthy store produces an empty report. Anything found here was
/// written some other way (manual edits, imports, or a parcel deleted after it was paid for) and needs a human to look
/// at it.
pub struct AuditApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuditApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuditApi ({:?})", self.db)
    }
}

impl<B> AuditApi<B>
where B: AuditManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Parcels marked as paid with no payment record.
    pub async fn find_unrecorded_paid_parcels(&self) -> Result<Vec<Parcel>, StoreError> {
        self.db.fetch_paid_parcels_without_payment().await
    }

    /// Payments whose parcel is missing, unpaid, or carries another payment's tracking id.
    pub async fn find_orphaned_payments(&self) -> Result<Vec<Payment>, StoreError> {
        self.db.fetch_payments_without_paid_parcel().await
    }

    /// Runs both checks and logs every finding.
    pub async fn run_audit(&self) -> Result<AuditReport, StoreError> {
        let paid_parcels_without_payment = self.find_unrecorded_paid_parcels().await?;
        let payments_without_paid_parcel = self.find_orphaned_payments().await?;
        for parcel in &paid_parcels_without_payment {
            warn!("🕵️ Parcel {} is marked as paid, but there is no payment record for it", parcel.id);
        }
        for payment in &payments_without_paid_parcel {
            warn!(
                "🕵️ Payment {} (tracking id {}) refers to parcel {}, which does not exist or is not marked as paid",
                payment.transaction_id, payment.tracking_id, payment.parcel_id
            );
        }
        Ok(AuditReport { paid_parcels_without_payment, payments_without_paid_parcel })
    }
}
