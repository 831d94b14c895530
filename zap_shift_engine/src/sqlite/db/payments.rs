use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{NewPayment, Payment},
    traits::{
        data_objects::{PaymentSortField, Sort},
        StoreError,
        UpdateResult,
    },
    zse_api::payment_objects::{PaymentQueryFilter, PaymentUpdate},
};

/// Inserts a payment record. A duplicate transaction id fails with [`StoreError::PaymentAlreadyExists`], and a
/// tracking id that is already in use fails with [`StoreError::TrackingIdCollision`].
pub async fn insert_payment(payment: NewPayment, conn: &mut SqliteConnection) -> Result<Payment, StoreError> {
    let result = sqlx::query_as::<_, Payment>(
        r#"
            INSERT INTO payments (
                amount,
                currency,
                customer_email,
                parcel_id,
                parcel_name,
                transaction_id,
                payment_status,
                paid_at,
                tracking_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(payment.amount)
    .bind(&payment.currency)
    .bind(&payment.customer_email)
    .bind(payment.parcel_id)
    .bind(&payment.parcel_name)
    .bind(&payment.transaction_id)
    .bind(&payment.payment_status)
    .bind(payment.paid_at)
    .bind(&payment.tracking_id)
    .fetch_one(conn)
    .await;
    let record = result.map_err(|e| StoreError::from_payment_insert(e, &payment))?;
    debug!("💰️ Payment [{}] inserted with id {}", record.transaction_id, record.id);
    Ok(record)
}

pub async fn fetch_payment(id: i64, conn: &mut SqliteConnection) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as("SELECT * FROM payments WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(payment)
}

pub async fn fetch_payment_by_transaction_id(
    transaction_id: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as("SELECT * FROM payments WHERE transaction_id = $1")
        .bind(transaction_id)
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}

fn search_query(filter: PaymentQueryFilter) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new("SELECT * FROM payments");
    if !filter.is_empty() {
        builder.push(" WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(email) = filter.customer_email {
        where_clause.push("customer_email = ");
        where_clause.push_bind_unseparated(email);
    }
    if let Some(txid) = filter.transaction_id {
        where_clause.push("transaction_id = ");
        where_clause.push_bind_unseparated(txid);
    }
    if let Some(parcel_id) = filter.parcel_id {
        where_clause.push("parcel_id = ");
        where_clause.push_bind_unseparated(parcel_id);
    }
    if let Some(tracking_id) = filter.tracking_id {
        where_clause.push("tracking_id = ");
        where_clause.push_bind_unseparated(tracking_id);
    }
    builder
}

pub async fn search_payments(
    filter: PaymentQueryFilter,
    sort: Sort<PaymentSortField>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Payment>, sqlx::Error> {
    let mut builder = search_query(filter);
    builder.push(sort.to_sql());
    trace!("💰️ Executing query: {}", builder.sql());
    let payments = builder.build_query_as::<Payment>().fetch_all(conn).await?;
    trace!("💰️ Result of search_payments: {}", payments.len());
    Ok(payments)
}

pub async fn find_one_payment(
    filter: PaymentQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let mut builder = search_query(filter);
    builder.push(Sort::ascending(PaymentSortField::Id).to_sql());
    builder.push(" LIMIT 1");
    let payment = builder.build_query_as::<Payment>().fetch_optional(conn).await?;
    Ok(payment)
}

pub async fn update_payment(
    id: i64,
    update: PaymentUpdate,
    conn: &mut SqliteConnection,
) -> Result<UpdateResult, StoreError> {
    if update.is_empty() {
        debug!("💰️ No fields to update for payment {id}. Update request skipped.");
        return Err(StoreError::UpdateNoOp);
    }
    let Some(existing) = fetch_payment(id, &mut *conn).await? else {
        return Ok(UpdateResult::unmatched());
    };
    if !update.changes(&existing) {
        return Ok(UpdateResult::unchanged());
    }
    if let Some(status) = update.payment_status {
        sqlx::query("UPDATE payments SET payment_status = $1 WHERE id = $2").bind(status).bind(id).execute(conn).await?;
    }
    debug!("💰️ Payment {id} updated");
    Ok(UpdateResult::modified())
}
