mod cents;

pub mod helpers;
pub mod op;
mod secret;

pub use cents::{Cents, CentsConversionError, DEFAULT_CURRENCY_CODE, MAX_CHARGE_CENTS};
pub use secret::Secret;
