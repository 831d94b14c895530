//! Zap Shift Engine
//!
//! The Zap Shift engine holds the core logic for taking payment for parcel deliveries. It is provider-agnostic: the
//! payment provider is reached through the [`PaymentSessionGateway`] trait, and storage through the traits in
//! [`traits`].
//!
//! The library is divided into three main sections:
//! 1. Database management and control ([`traits`] and the SQLite backend, [`SqliteDatabase`]). You should never need
//!    to access the database directly. Instead, use the public API provided by the engine. The exception is the data
//!    types used in the database. These are defined in the `db_types` module and are public.
//! 2. The engine public API (`zse_api`). This provides checkout, idempotent payment reconciliation, parcel and payment
//!    queries, user registration and consistency audits.
//! 3. Helpers, most importantly the tracking id generator.
pub mod db_types;
pub mod helpers;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;
mod zse_api;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    AuditManagement,
    GatewayError,
    ParcelManagement,
    PaymentManagement,
    PaymentSessionGateway,
    ReconciliationDatabase,
    StoreError,
    UserManagement,
};
pub use zse_api::{
    audit_api::AuditApi,
    checkout_api::CheckoutApi,
    checkout_objects,
    errors::{ParcelApiError, PaymentsApiError, ReconciliationError, UserApiError},
    parcel_api::ParcelApi,
    parcel_objects,
    payment_objects,
    payments_api::PaymentsApi,
    reconciliation_api::{ReconciliationApi, MAX_TRACKING_ID_ATTEMPTS},
    reconciliation_objects::ReconciliationResult,
    user_api::UserApi,
};
