use serde::{Deserialize, Serialize};

use crate::db_types::{Parcel, PaymentStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ParcelQueryFilter {
    pub sender_email: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub tracking_id: Option<String>,
}

impl ParcelQueryFilter {
    pub fn with_sender_email<S: Into<String>>(mut self, email: S) -> Self {
        self.sender_email = Some(email.into());
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn with_tracking_id<S: Into<String>>(mut self, tracking_id: S) -> Self {
        self.tracking_id = Some(tracking_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sender_email.is_none() && self.payment_status.is_none() && self.tracking_id.is_none()
    }
}

/// A partial update to a parcel. Only the fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelUpdate {
    pub parcel_name: Option<String>,
    pub cost: Option<f64>,
    pub payment_status: Option<PaymentStatus>,
    pub tracking_id: Option<String>,
}

impl ParcelUpdate {
    pub fn with_parcel_name<S: Into<String>>(mut self, name: S) -> Self {
        self.parcel_name = Some(name.into());
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn with_tracking_id<S: Into<String>>(mut self, tracking_id: S) -> Self {
        self.tracking_id = Some(tracking_id.into());
        self
    }

    /// The update that marks a parcel as paid and stamps it with its tracking id.
    pub fn mark_paid<S: Into<String>>(tracking_id: S) -> Self {
        Self::default().with_payment_status(PaymentStatus::Paid).with_tracking_id(tracking_id)
    }

    pub fn is_empty(&self) -> bool {
        self.parcel_name.is_none() && self.cost.is_none() && self.payment_status.is_none() && self.tracking_id.is_none()
    }

    /// Checks that applying this update to `parcel` keeps its payment state consistent.
    ///
    /// A parcel has a tracking id if and only if it is paid. Once paid, it stays paid and keeps its tracking id.
    pub fn check_payment_transition(&self, parcel: &Parcel) -> Result<(), String> {
        let status = self.payment_status.unwrap_or(parcel.payment_status);
        let tracking_id = self.tracking_id.as_ref().or(parcel.tracking_id.as_ref());
        if parcel.is_paid() {
            if status != PaymentStatus::Paid {
                return Err(format!("Parcel {} has been paid and cannot be marked as {status}", parcel.id));
            }
            if tracking_id != parcel.tracking_id.as_ref() {
                return Err(format!("Parcel {} already has a tracking id", parcel.id));
            }
        }
        match (status, tracking_id) {
            (PaymentStatus::Paid, None) => Err("A paid parcel must have a tracking id".to_string()),
            (PaymentStatus::Unpaid, Some(_)) => Err("An unpaid parcel cannot have a tracking id".to_string()),
            _ => Ok(()),
        }
    }

    /// Returns true if applying this update to `parcel` would change at least one stored value.
    pub fn changes(&self, parcel: &Parcel) -> bool {
        self.parcel_name.as_ref().is_some_and(|n| n != &parcel.parcel_name)
            || self.cost.is_some_and(|c| c != parcel.cost)
            || self.payment_status.is_some_and(|s| s != parcel.payment_status)
            || self.tracking_id.as_ref().is_some_and(|t| parcel.tracking_id.as_ref() != Some(t))
    }
}
