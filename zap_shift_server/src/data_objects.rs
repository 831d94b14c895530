use serde::{Deserialize, Serialize};
use zap_shift_engine::{db_types::Payment, traits::UpdateResult, ReconciliationResult};

pub const ALREADY_RECORDED_MESSAGE: &str = "already exist";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailQuery {
    #[serde(default)]
    pub email: Option<String>,
}

impl EmailQuery {
    /// The requested email, with blank values treated as absent.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertedResponse {
    pub inserted_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted_count: u64,
}

/// The body of a `PATCH /payment-success` response.
///
/// * A payment recorded by this call: `{success: true, modifyParcel, trackingId, transactionId, paymentInfo}`
/// * A replay of an already-recorded payment: `{success: true, message: "already exist", trackingId, transactionId}`
/// * A session that has not been paid: `{success: false}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modify_parcel: Option<UpdateResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<Payment>,
}

impl From<ReconciliationResult> for ReconciliationResponse {
    fn from(result: ReconciliationResult) -> Self {
        match result {
            ReconciliationResult::Recorded { parcel_update, payment } => Self {
                success: true,
                modify_parcel: Some(parcel_update),
                tracking_id: Some(payment.tracking_id.clone()),
                transaction_id: Some(payment.transaction_id.clone()),
                payment_info: Some(payment),
                ..Default::default()
            },
            ReconciliationResult::AlreadyRecorded { tracking_id, transaction_id } => Self {
                success: true,
                message: Some(ALREADY_RECORDED_MESSAGE.to_string()),
                tracking_id: Some(tracking_id),
                transaction_id: Some(transaction_id),
                ..Default::default()
            },
            ReconciliationResult::NotPaid => Self::default(),
        }
    }
}
