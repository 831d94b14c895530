use sqlx::SqliteConnection;

use crate::db_types::{Parcel, Payment};

/// Parcels marked as paid that no payment record refers to.
pub async fn paid_parcels_without_payment(conn: &mut SqliteConnection) -> Result<Vec<Parcel>, sqlx::Error> {
    let parcels = sqlx::query_as(
        r#"
            SELECT * FROM parcels
            WHERE payment_status = 'paid'
            AND NOT EXISTS (SELECT 1 FROM payments WHERE payments.parcel_id = parcels.id)
            ORDER BY id ASC
        "#,
    )
    .fetch_all(conn)
    .await?;
    Ok(parcels)
}

/// Payment records whose parcel is missing, not marked as paid, or stamped with a different tracking id. The last case
/// is a parcel that was paid for more than once.
pub async fn payments_without_paid_parcel(conn: &mut SqliteConnection) -> Result<Vec<Payment>, sqlx::Error> {
    let payments = sqlx::query_as(
        r#"
            SELECT payments.* FROM payments
            LEFT JOIN parcels ON parcels.id = payments.parcel_id
            WHERE parcels.id IS NULL
            OR parcels.payment_status != 'paid'
            OR parcels.tracking_id IS NOT payments.tracking_id
            ORDER BY payments.id ASC
        "#,
    )
    .fetch_all(conn)
    .await?;
    Ok(payments)
}
