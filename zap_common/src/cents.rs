use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub},
    str::FromStr,
};

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::op;

pub const DEFAULT_CURRENCY_CODE: &str = "usd";

/// The largest single charge the payment provider accepts, in minor units.
pub const MAX_CHARGE_CENTS: i64 = 99_999_999;

//--------------------------------------        Cents         ---------------------------------------------------------
/// An amount of money in the currency's minor unit (e.g. cents for USD).
///
/// The payment provider only ever deals in integer minor units. Amounts entered by users, and the amounts we store in
/// the payment ledger, are in major units (e.g. dollars). Conversions between the two happen here and nowhere else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i64);

op!(binary Cents, Add, add);
op!(binary Cents, Sub, sub);
op!(inplace Cents, AddAssign, add_assign);

impl Sum for Cents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CentsConversionError {
    #[error("{0} is not a finite number")]
    NotFinite(f64),
    #[error("Amount must be positive, but got {0}")]
    NotPositive(f64),
    #[error("{0} exceeds the maximum chargeable amount")]
    TooLarge(f64),
    #[error("{0} cannot be read as a decimal amount")]
    NotDecimal(f64),
}

impl From<i64> for Cents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Converts a major-unit amount into minor units, rounding to the nearest cent (half away from zero).
    ///
    /// Rounding is done on the decimal the user typed rather than on its binary approximation, so `1.005` is 101 cents.
    /// Only strictly positive amounts up to [`MAX_CHARGE_CENTS`] are chargeable.
    pub fn from_major_units(amount: f64) -> Result<Self, CentsConversionError> {
        if !amount.is_finite() {
            return Err(CentsConversionError::NotFinite(amount));
        }
        if amount < 0.005 {
            return Err(CentsConversionError::NotPositive(amount));
        }
        if amount > (MAX_CHARGE_CENTS + 1) as f64 / 100.0 {
            return Err(CentsConversionError::TooLarge(amount));
        }
        // f64's Display is the shortest decimal that reads back as the same float
        let major = Decimal::from_str(&amount.to_string()).map_err(|_| CentsConversionError::NotDecimal(amount))?;
        let cents = (major * Decimal::ONE_HUNDRED).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let cents = cents.to_i64().ok_or(CentsConversionError::NotDecimal(amount))?;
        if cents < 1 {
            return Err(CentsConversionError::NotPositive(amount));
        }
        if cents > MAX_CHARGE_CENTS {
            return Err(CentsConversionError::TooLarge(amount));
        }
        Ok(Self(cents))
    }

    /// The amount in major units, e.g. 2599 cents is 25.99.
    pub fn to_major_units(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}
