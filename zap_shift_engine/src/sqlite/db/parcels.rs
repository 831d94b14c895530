use chrono::Utc;
use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{NewParcel, Parcel, ParcelId},
    traits::{
        data_objects::{ParcelSortField, Sort},
        StoreError,
        UpdateResult,
    },
    zse_api::parcel_objects::{ParcelQueryFilter, ParcelUpdate},
};

/// Inserts a new parcel into the database using the given connection. New parcels are always unpaid.
pub async fn insert_parcel(parcel: NewParcel, conn: &mut SqliteConnection) -> Result<Parcel, StoreError> {
    let parcel: Parcel = sqlx::query_as(
        r#"
            INSERT INTO parcels (
                sender_email,
                parcel_name,
                cost,
                receiver_name,
                receiver_email,
                pickup_address,
                delivery_address,
                parcel_weight,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(parcel.sender_email)
    .bind(parcel.parcel_name)
    .bind(parcel.cost)
    .bind(parcel.receiver_name)
    .bind(parcel.receiver_email)
    .bind(parcel.pickup_address)
    .bind(parcel.delivery_address)
    .bind(parcel.parcel_weight)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    debug!("📦️ Parcel [{}] inserted with id {}", parcel.parcel_name, parcel.id);
    Ok(parcel)
}

pub async fn fetch_parcel(id: ParcelId, conn: &mut SqliteConnection) -> Result<Option<Parcel>, sqlx::Error> {
    let parcel = sqlx::query_as("SELECT * FROM parcels WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(parcel)
}

fn search_query(filter: ParcelQueryFilter) -> QueryBuilder<'static, Sqlite> {
    let mut builder = QueryBuilder::new("SELECT * FROM parcels");
    if !filter.is_empty() {
        builder.push(" WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(email) = filter.sender_email {
        where_clause.push("sender_email = ");
        where_clause.push_bind_unseparated(email);
    }
    if let Some(status) = filter.payment_status {
        where_clause.push("payment_status = ");
        where_clause.push_bind_unseparated(status);
    }
    if let Some(tracking_id) = filter.tracking_id {
        where_clause.push("tracking_id = ");
        where_clause.push_bind_unseparated(tracking_id);
    }
    builder
}

/// Fetches parcels according to criteria specified in the `ParcelQueryFilter`, in the given order.
pub async fn search_parcels(
    filter: ParcelQueryFilter,
    sort: Sort<ParcelSortField>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Parcel>, sqlx::Error> {
    let mut builder = search_query(filter);
    builder.push(sort.to_sql());
    trace!("📦️ Executing query: {}", builder.sql());
    let parcels = builder.build_query_as::<Parcel>().fetch_all(conn).await?;
    trace!("📦️ Result of search_parcels: {}", parcels.len());
    Ok(parcels)
}

/// Returns the parcel with the lowest id matching the filter.
pub async fn find_one_parcel(
    filter: ParcelQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Option<Parcel>, sqlx::Error> {
    let mut builder = search_query(filter);
    builder.push(Sort::ascending(ParcelSortField::Id).to_sql());
    builder.push(" LIMIT 1");
    let parcel = builder.build_query_as::<Parcel>().fetch_optional(conn).await?;
    Ok(parcel)
}

/// Applies a partial update to the parcel.
///
/// The current record is read first, so that an update that would not change anything is reported as
/// `modified_count: 0`, and so that updates which would break the paid/tracking id pairing are refused with
/// [`StoreError::InvalidParcelUpdate`]. Call this inside a transaction if the read and the write must be atomic.
pub async fn update_parcel(
    id: ParcelId,
    update: ParcelUpdate,
    conn: &mut SqliteConnection,
) -> Result<UpdateResult, StoreError> {
    if update.is_empty() {
        debug!("📦️ No fields to update for parcel {id}. Update request skipped.");
        return Err(StoreError::UpdateNoOp);
    }
    let Some(existing) = fetch_parcel(id, &mut *conn).await? else {
        debug!("📦️ Parcel {id} does not exist. Nothing to update.");
        return Ok(UpdateResult::unmatched());
    };
    if !update.changes(&existing) {
        trace!("📦️ Update for parcel {id} does not change anything.");
        return Ok(UpdateResult::unchanged());
    }
    update.check_payment_transition(&existing).map_err(|reason| {
        debug!("📦️ Refusing update for parcel {id}. {reason}");
        StoreError::InvalidParcelUpdate(reason)
    })?;
    let tracking_id = update.tracking_id.clone();
    let mut builder = QueryBuilder::<Sqlite>::new("UPDATE parcels SET ");
    let mut set_clause = builder.separated(", ");
    if let Some(name) = update.parcel_name {
        set_clause.push("parcel_name = ");
        set_clause.push_bind_unseparated(name);
    }
    if let Some(cost) = update.cost {
        set_clause.push("cost = ");
        set_clause.push_bind_unseparated(cost);
    }
    if let Some(status) = update.payment_status {
        set_clause.push("payment_status = ");
        set_clause.push_bind_unseparated(status);
    }
    if let Some(tracking_id) = update.tracking_id {
        set_clause.push("tracking_id = ");
        set_clause.push_bind_unseparated(tracking_id);
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    trace!("📦️ Executing query: {}", builder.sql());
    builder.build().execute(conn).await.map_err(|e| match e {
        sqlx::Error::Database(err) if err.is_unique_violation() => {
            StoreError::TrackingIdCollision(tracking_id.unwrap_or_default())
        },
        _ => StoreError::from(e),
    })?;
    debug!("📦️ Parcel {id} updated");
    Ok(UpdateResult::modified())
}

pub async fn delete_parcel(id: ParcelId, conn: &mut SqliteConnection) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM parcels WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected())
}
