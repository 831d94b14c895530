use std::time::Duration;

use log::*;
use tokio::task::JoinHandle;
use zap_shift_engine::{AuditApi, SqliteDatabase};

/// Starts the audit worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// The worker only reports. Each finding is logged by [`AuditApi::run_audit`] for a human to resolve.
pub fn start_audit_worker(db: SqliteDatabase, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        let api = AuditApi::new(db);
        info!("🕵️ Payment audit worker started. Running every {} min", interval.as_secs() / 60);
        loop {
            timer.tick().await;
            debug!("🕵️ Running payment audit");
            match api.run_audit().await {
                Ok(report) if report.is_clean() => debug!("🕵️ Audit complete. Parcels and payments agree."),
                Ok(report) => warn!(
                    "🕵️ Audit complete. {} paid parcels have no payment record and {} payments have no paid parcel",
                    report.paid_parcels_without_payment.len(),
                    report.payments_without_paid_parcel.len()
                ),
                Err(e) => error!("🕵️ Error running payment audit: {e}"),
            }
        }
    })
}
