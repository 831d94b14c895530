//! `SqliteDatabase` is a concrete implementation of a Zap Shift engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`traits`] module.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{audit, db_url, new_pool, parcels, payments, users};
use crate::{
    db_types::{NewParcel, NewPayment, NewUser, Parcel, ParcelId, Payment, User},
    traits::{
        data_objects::{ParcelSortField, PaymentSortField, RecordedPayment, Sort},
        AuditManagement,
        ParcelManagement,
        PaymentManagement,
        ReconciliationDatabase,
        StoreError,
        UpdateResult,
        UserManagement,
    },
    zse_api::{
        parcel_objects::{ParcelQueryFilter, ParcelUpdate},
        payment_objects::{PaymentQueryFilter, PaymentUpdate},
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl ReconciliationDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn record_payment_for_parcel(&self, payment: NewPayment) -> Result<RecordedPayment, StoreError> {
        let mut tx = self.pool.begin().await?;
        // The insert must be the first statement in the transaction. SQLite then waits for a concurrent writer to
        // finish (and this insert fails on the unique index) instead of returning SQLITE_BUSY.
        let payment = payments::insert_payment(payment, &mut tx).await?;
        let parcel_id = payment.parcel_id;
        let parcel_update = match parcels::fetch_parcel(parcel_id, &mut tx).await? {
            Some(parcel) if parcel.is_paid() => {
                warn!(
                    "🗃️ Parcel {parcel_id} is already paid (tracking id {}). Transaction {} is recorded with tracking \
                     id {}, but the parcel is left as is.",
                    parcel.tracking_id.as_deref().unwrap_or("<none>"),
                    payment.transaction_id,
                    payment.tracking_id
                );
                UpdateResult::unchanged()
            },
            Some(_) => {
                let update = ParcelUpdate::mark_paid(payment.tracking_id.clone());
                parcels::update_parcel(parcel_id, update, &mut tx).await?
            },
            None => {
                warn!(
                    "🗃️ Transaction {} refers to parcel {parcel_id}, which does not exist. The payment is recorded \
                     anyway.",
                    payment.transaction_id
                );
                UpdateResult::unmatched()
            },
        };
        tx.commit().await?;
        debug!("🗃️ Transaction {} recorded against parcel {parcel_id}", payment.transaction_id);
        Ok(RecordedPayment { payment, parcel_update })
    }
}

impl ParcelManagement for SqliteDatabase {
    async fn insert_parcel(&self, parcel: NewParcel) -> Result<Parcel, StoreError> {
        let mut conn = self.pool.acquire().await?;
        parcels::insert_parcel(parcel, &mut conn).await
    }

    async fn fetch_parcel(&self, id: ParcelId) -> Result<Option<Parcel>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(parcels::fetch_parcel(id, &mut conn).await?)
    }

    async fn find_one_parcel(&self, filter: ParcelQueryFilter) -> Result<Option<Parcel>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(parcels::find_one_parcel(filter, &mut conn).await?)
    }

    async fn find_parcels(
        &self,
        filter: ParcelQueryFilter,
        sort: Sort<ParcelSortField>,
    ) -> Result<Vec<Parcel>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(parcels::search_parcels(filter, sort, &mut conn).await?)
    }

    async fn update_parcel(&self, id: ParcelId, update: ParcelUpdate) -> Result<UpdateResult, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = parcels::update_parcel(id, update, &mut tx).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn delete_parcel(&self, id: ParcelId) -> Result<u64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(parcels::delete_parcel(id, &mut conn).await?)
    }
}

impl PaymentManagement for SqliteDatabase {
    async fn insert_payment(&self, payment: NewPayment) -> Result<Payment, StoreError> {
        let mut conn = self.pool.acquire().await?;
        payments::insert_payment(payment, &mut conn).await
    }

    async fn fetch_payment(&self, id: i64) -> Result<Option<Payment>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(payments::fetch_payment(id, &mut conn).await?)
    }

    async fn find_one_payment(&self, filter: PaymentQueryFilter) -> Result<Option<Payment>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(payments::find_one_payment(filter, &mut conn).await?)
    }

    async fn find_payments(
        &self,
        filter: PaymentQueryFilter,
        sort: Sort<PaymentSortField>,
    ) -> Result<Vec<Payment>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(payments::search_payments(filter, sort, &mut conn).await?)
    }

    async fn update_payment(&self, id: i64, update: PaymentUpdate) -> Result<UpdateResult, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = payments::update_payment(id, update, &mut tx).await?;
        tx.commit().await?;
        Ok(result)
    }

    async fn fetch_payment_by_transaction_id(&self, transaction_id: &str) -> Result<Option<Payment>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(payments::fetch_payment_by_transaction_id(transaction_id, &mut conn).await?)
    }
}

impl UserManagement for SqliteDatabase {
    async fn insert_user(&self, user: NewUser) -> Result<(User, bool), StoreError> {
        let mut conn = self.pool.acquire().await?;
        users::idempotent_insert(user, &mut conn).await
    }

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(users::fetch_user_by_email(email, &mut conn).await?)
    }
}

impl AuditManagement for SqliteDatabase {
    async fn fetch_paid_parcels_without_payment(&self) -> Result<Vec<Parcel>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(audit::paid_parcels_without_payment(&mut conn).await?)
    }

    async fn fetch_payments_without_paid_parcel(&self) -> Result<Vec<Payment>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        Ok(audit::payments_without_paid_parcel(&mut conn).await?)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
