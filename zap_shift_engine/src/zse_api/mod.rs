//! # Zap Shift engine public API
//!
//! The `zse_api` module exposes the programmatic API for the Zap Shift engine. Each API is created by supplying a
//! backend that implements the traits it needs, and (for the checkout and reconciliation APIs) a payment session
//! gateway.
//!
//! * [`reconciliation_api`] turns completed checkout sessions into payment records and paid parcels, idempotently.
//! * [`checkout_api`] validates parcel prices and opens hosted checkout sessions.
//! * [`parcel_api`] and [`payments_api`] provide access to parcels and payment history.
//! * [`user_api`] registers users.
//! * [`audit_api`] reports parcels and payments that disagree with each other.
//!
//! ```rust,ignore
//! use zap_shift_engine::{ReconciliationApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = ReconciliationApi::new(db, my_gateway);
//! let result = api.reconcile_session("cs_test_a1").await?;
//! ```

pub mod audit_api;
pub mod checkout_api;
pub mod checkout_objects;
pub mod errors;
pub mod parcel_api;
pub mod parcel_objects;
pub mod payment_objects;
pub mod payments_api;
pub mod reconciliation_api;
pub mod reconciliation_objects;
pub mod user_api;
