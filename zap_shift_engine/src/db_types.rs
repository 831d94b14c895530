use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Conversion error: {0}")]
pub struct ConversionError(String);

//--------------------------------------       ParcelId        ---------------------------------------------------------
/// The store-assigned identity of a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct ParcelId(pub i64);

impl FromStr for ParcelId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self).map_err(|e| ConversionError(format!("'{s}' is not a valid parcel id. {e}")))
    }
}

impl From<i64> for ParcelId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for ParcelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ParcelId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

//--------------------------------------     PaymentStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// The parcel has been booked but not paid for. It has no tracking id.
    #[default]
    Unpaid,
    /// Payment has been confirmed by the payment provider and a tracking id has been issued.
    Paid,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "unpaid"),
            PaymentStatus::Paid => write!(f, "paid"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

//--------------------------------------        Parcel         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    #[serde(rename = "_id")]
    pub id: ParcelId,
    pub sender_email: String,
    pub parcel_name: String,
    /// The quoted price in major currency units.
    pub cost: f64,
    pub payment_status: PaymentStatus,
    /// Present if and only if `payment_status` is `Paid`.
    pub tracking_id: Option<String>,
    pub receiver_name: Option<String>,
    pub receiver_email: Option<String>,
    pub pickup_address: Option<String>,
    pub delivery_address: Option<String>,
    pub parcel_weight: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Parcel {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

/// A parcel booking as submitted by a sender. New parcels are always unpaid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewParcel {
    pub sender_email: String,
    pub parcel_name: String,
    pub cost: f64,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub receiver_email: Option<String>,
    #[serde(default)]
    pub pickup_address: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub parcel_weight: Option<f64>,
}

impl NewParcel {
    pub fn new<S: Into<String>>(sender_email: S, parcel_name: S, cost: f64) -> Self {
        Self { sender_email: sender_email.into(), parcel_name: parcel_name.into(), cost, ..Default::default() }
    }

    pub fn with_receiver<S: Into<String>>(mut self, name: S, email: S) -> Self {
        self.receiver_name = Some(name.into());
        self.receiver_email = Some(email.into());
        self
    }

    pub fn with_addresses<S: Into<String>>(mut self, pickup: S, delivery: S) -> Self {
        self.pickup_address = Some(pickup.into());
        self.delivery_address = Some(delivery.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.parcel_weight = Some(weight);
        self
    }
}

//--------------------------------------        Payment        ---------------------------------------------------------
/// A payment ledger entry. Exactly one exists per provider transaction id, and it is never modified by the payment
/// flow once written.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id")]
    pub id: i64,
    /// Amount paid in major currency units, as reported by the payment provider.
    pub amount: f64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub parcel_id: ParcelId,
    pub parcel_name: String,
    pub transaction_id: String,
    /// The payment status string exactly as the provider reported it.
    pub payment_status: String,
    pub paid_at: DateTime<Utc>,
    pub tracking_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub amount: f64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub parcel_id: ParcelId,
    pub parcel_name: String,
    pub transaction_id: String,
    pub payment_status: String,
    pub paid_at: DateTime<Utc>,
    pub tracking_id: String,
}

impl NewPayment {
    /// Issues a copy of this payment with a different tracking id. Used when the generated id collides with one that
    /// is already in use.
    pub fn with_tracking_id<S: Into<String>>(mut self, tracking_id: S) -> Self {
        self.tracking_id = tracking_id.into();
        self
    }
}

//--------------------------------------         User          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    #[serde(default, alias = "displayName")]
    pub name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

pub const DEFAULT_USER_ROLE: &str = "user";
