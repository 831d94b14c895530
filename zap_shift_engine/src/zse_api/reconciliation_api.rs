use std::fmt::Debug;

use chrono::Utc;
use log::*;
use zap_common::DEFAULT_CURRENCY_CODE;

use crate::{
    db_types::{NewPayment, ParcelId},
    helpers::generate_tracking_id,
    traits::{PaymentSessionGateway, ReconciliationDatabase, StoreError},
    zse_api::{
        checkout_objects::SessionInfo,
        errors::ReconciliationError,
        reconciliation_objects::ReconciliationResult,
    },
};

/// How many fresh tracking ids to try before giving up on a payment.
pub const MAX_TRACKING_ID_ATTEMPTS: usize = 3;

/// `ReconciliationApi` turns a completed checkout session into a payment record and a paid parcel.
///
/// The customer's browser is sent back to the site with the checkout session id once the hosted payment page closes.
/// The site then asks the server to reconcile that session. The customer may reload the page, hit back, or have two
/// tabs open, so the same session can arrive any number of times, concurrently. Reconciliation is idempotent on the
/// provider's transaction id: the first call records the payment and issues a tracking id, and every other call returns
/// that same tracking id without writing anything.
pub struct ReconciliationApi<B, G> {
    db: B,
    gateway: G,
}

impl<B, G> Debug for ReconciliationApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconciliationApi")
    }
}

impl<B, G> ReconciliationApi<B, G> {
    pub fn new(db: B, gateway: G) -> Self {
        Self { db, gateway }
    }
}

impl<B, G> ReconciliationApi<B, G>
where
    B: ReconciliationDatabase,
    G: PaymentSessionGateway,
{
    /// Reconciles the checkout session with the given id.
    ///
    /// 1. The session is retrieved from the payment provider. If it has no transaction id, the customer has not paid
    ///    and nothing is written.
    /// 2. If a payment record already exists for the transaction id, its tracking id is returned.
    /// 3. If the provider reports the session as paid, a tracking id is generated and the payment is recorded, and the
    ///    parcel marked as paid, in a single atomic store operation.
    ///
    /// Step 2 is only a shortcut. The store's unique index on the transaction id is what actually guarantees that
    /// concurrent calls produce exactly one record: a call that loses the race to insert is reported as
    /// `AlreadyRecorded` with the winner's tracking id.
    pub async fn reconcile_session(&self, session_id: &str) -> Result<ReconciliationResult, ReconciliationError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(ReconciliationError::MissingSessionId);
        }
        let session = self.gateway.retrieve_session(session_id).await?;
        trace!("🔄️💳️ Retrieved {session}");
        let Some(transaction_id) = session.transaction_id.clone() else {
            debug!("🔄️💳️ Session {session_id} has no transaction yet. Nothing to reconcile.");
            return Ok(ReconciliationResult::NotPaid);
        };
        if let Some(existing) = self.db.fetch_payment_by_transaction_id(&transaction_id).await? {
            debug!(
                "🔄️💳️ Transaction {transaction_id} was already recorded with tracking id {}",
                existing.tracking_id
            );
            return Ok(existing.into());
        }
        if !session.is_paid() {
            info!(
                "🔄️💳️ Session {session_id} has transaction {transaction_id}, but its status is '{}'. Not recording it.",
                session.payment_status
            );
            return Ok(ReconciliationResult::NotPaid);
        }
        let payment = new_payment_from_session(&session, transaction_id)?;
        self.record_payment(payment).await
    }

    async fn record_payment(&self, mut payment: NewPayment) -> Result<ReconciliationResult, ReconciliationError> {
        for attempt in 1..=MAX_TRACKING_ID_ATTEMPTS {
            match self.db.record_payment_for_parcel(payment.clone()).await {
                Ok(recorded) => {
                    let update = recorded.parcel_update;
                    info!(
                        "🔄️💳️ Transaction {} recorded for parcel {}. Tracking id {}. (matched: {}, modified: {})",
                        recorded.payment.transaction_id,
                        recorded.payment.parcel_id,
                        recorded.payment.tracking_id,
                        update.matched_count,
                        update.modified_count
                    );
                    return Ok(ReconciliationResult::Recorded { parcel_update: update, payment: recorded.payment });
                },
                Err(StoreError::PaymentAlreadyExists(txid)) => {
                    debug!("🔄️💳️ Lost the race to record {txid}. Returning the existing record.");
                    let existing = self
                        .db
                        .fetch_payment_by_transaction_id(&txid)
                        .await?
                        .ok_or(StoreError::PaymentAlreadyExists(txid))?;
                    return Ok(existing.into());
                },
                Err(StoreError::TrackingIdCollision(tracking_id)) => {
                    warn!(
                        "🔄️💳️ Tracking id {tracking_id} is already in use (attempt {attempt} of \
                         {MAX_TRACKING_ID_ATTEMPTS}). Generating a new one."
                    );
                    payment = payment.with_tracking_id(generate_tracking_id());
                },
                Err(e) => return Err(e.into()),
            }
        }
        error!(
            "🔄️💳️ Could not record transaction {} after {MAX_TRACKING_ID_ATTEMPTS} tracking id collisions",
            payment.transaction_id
        );
        Err(ReconciliationError::TrackingIdExhausted(MAX_TRACKING_ID_ATTEMPTS))
    }
}

fn new_payment_from_session(session: &SessionInfo, transaction_id: String) -> Result<NewPayment, ReconciliationError> {
    let invalid = |reason: String| {
        error!(
            "🔄️💳️ Session {} is paid (transaction {transaction_id}) but cannot be matched to a parcel. {reason}. This \
             payment needs manual attention.",
            session.session_id
        );
        ReconciliationError::InvalidSessionMetadata { session_id: session.session_id.clone(), reason }
    };
    let parcel_id = session
        .parcel_id
        .as_deref()
        .ok_or_else(|| invalid("The session carries no parcel id".to_string()))?
        .parse::<ParcelId>()
        .map_err(|e| invalid(e.to_string()))?;
    let amount = session.amount_total.map(|c| c.to_major_units()).unwrap_or_else(|| {
        warn!("🔄️💳️ Paid session {} did not report an amount. Recording 0.", session.session_id);
        0.0
    });
    Ok(NewPayment {
        amount,
        currency: session.currency.clone().unwrap_or_else(|| DEFAULT_CURRENCY_CODE.to_string()),
        customer_email: session.customer_email.clone(),
        parcel_id,
        parcel_name: session.parcel_name.clone().unwrap_or_default(),
        transaction_id,
        payment_status: session.payment_status.clone(),
        paid_at: Utc::now(),
        tracking_id: generate_tracking_id(),
    })
}
