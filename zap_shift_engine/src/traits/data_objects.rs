use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::db_types::{Parcel, Payment};

/// The outcome of a partial update against a single record.
///
/// `matched_count` is the number of records the id resolved to (0 or 1). `modified_count` is the number of records
/// whose stored values actually changed, so re-applying an identical update reports `matched_count: 1` and
/// `modified_count: 0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateResult {
    pub fn unmatched() -> Self {
        Self::default()
    }

    pub fn unchanged() -> Self {
        Self { matched_count: 1, modified_count: 0 }
    }

    pub fn modified() -> Self {
        Self { matched_count: 1, modified_count: 1 }
    }
}

/// The result of atomically writing a payment record and marking its parcel as paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedPayment {
    pub payment: Payment,
    pub parcel_update: UpdateResult,
}

/// A paid parcel with no matching payment record, or a payment whose parcel never got marked as paid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub paid_parcels_without_payment: Vec<Parcel>,
    pub payments_without_paid_parcel: Vec<Payment>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.paid_parcels_without_payment.is_empty() && self.payments_without_paid_parcel.is_empty()
    }
}

//--------------------------------------       Sorting         ---------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[serde(alias = "asc")]
    Ascending,
    #[default]
    #[serde(alias = "desc")]
    Descending,
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ASC"),
            SortDirection::Descending => write!(f, "DESC"),
        }
    }
}

/// A field that search results may be ordered by. Only whitelisted columns can be sorted on.
pub trait SortField: Copy {
    fn column(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParcelSortField {
    #[default]
    CreatedAt,
    Cost,
    Id,
}

impl SortField for ParcelSortField {
    fn column(&self) -> &'static str {
        match self {
            ParcelSortField::CreatedAt => "created_at",
            ParcelSortField::Cost => "cost",
            ParcelSortField::Id => "id",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentSortField {
    #[default]
    PaidAt,
    Amount,
    Id,
}

impl SortField for PaymentSortField {
    fn column(&self) -> &'static str {
        match self {
            PaymentSortField::PaidAt => "paid_at",
            PaymentSortField::Amount => "amount",
            PaymentSortField::Id => "id",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort<F: SortField> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: SortField> Sort<F> {
    pub fn ascending(field: F) -> Self {
        Self { field, direction: SortDirection::Ascending }
    }

    pub fn descending(field: F) -> Self {
        Self { field, direction: SortDirection::Descending }
    }

    /// The `ORDER BY` clause for this sort. Ties are broken by id in the same direction so that results are stable.
    pub fn to_sql(&self) -> String {
        format!(" ORDER BY {} {dir}, id {dir}", self.field.column(), dir = self.direction)
    }
}
