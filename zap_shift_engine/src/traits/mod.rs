//! #  Backend interface contracts.
//!
//! This module defines the behaviour that backends need to expose in order to be supported by the Zap Shift engine.
//!
//! * [`ParcelManagement`] and [`PaymentManagement`] are the typed store façades over the parcel and payment
//!   collections.
//! * [`ReconciliationDatabase`] adds the single atomic operation that records a payment and marks its parcel as paid.
//! * [`AuditManagement`] cross-checks the two collections for records that disagree.
//! * [`UserManagement`] stores registered users.
//! * [`PaymentSessionGateway`] is the contract for hosted-checkout payment providers.
mod parcel_management;
mod payment_management;
mod payment_session_gateway;
mod reconciliation_database;
mod store_error;
mod user_management;

pub mod data_objects;

pub use data_objects::{AuditReport, RecordedPayment, UpdateResult};
pub use parcel_management::ParcelManagement;
pub use payment_management::PaymentManagement;
pub use payment_session_gateway::{GatewayError, PaymentSessionGateway};
pub use reconciliation_database::{AuditManagement, ReconciliationDatabase};
pub use store_error::StoreError;
pub use user_management::UserManagement;
