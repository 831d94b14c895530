use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewParcel, Parcel, ParcelId},
    traits::{
        data_objects::{ParcelSortField, Sort},
        ParcelManagement,
    },
    zse_api::{errors::ParcelApiError, parcel_objects::ParcelQueryFilter},
};

/// `ParcelApi` handles parcel bookings: creating, listing, fetching and cancelling them.
pub struct ParcelApi<B> {
    db: B,
}

impl<B: Debug> Debug for ParcelApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParcelApi ({:?})", self.db)
    }
}

impl<B> ParcelApi<B>
where B: ParcelManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Books a new parcel. New parcels are always unpaid and have no tracking id.
    pub async fn create_parcel(&self, parcel: NewParcel) -> Result<Parcel, ParcelApiError> {
        if parcel.sender_email.trim().is_empty() {
            return Err(ParcelApiError::InvalidParcel("A sender email is required".into()));
        }
        if parcel.parcel_name.trim().is_empty() {
            return Err(ParcelApiError::InvalidParcel("A parcel name is required".into()));
        }
        if !parcel.cost.is_finite() || parcel.cost <= 0.0 {
            return Err(ParcelApiError::InvalidParcel(format!("Cost must be a positive amount, not {}", parcel.cost)));
        }
        let parcel = self.db.insert_parcel(parcel).await?;
        debug!("📦️ Parcel {} booked by {}", parcel.id, parcel.sender_email);
        Ok(parcel)
    }

    /// Lists parcels, newest first. If `sender_email` is given, only that sender's parcels are returned.
    pub async fn parcels(&self, sender_email: Option<&str>) -> Result<Vec<Parcel>, ParcelApiError> {
        let filter = match sender_email {
            Some(email) => ParcelQueryFilter::default().with_sender_email(email),
            None => ParcelQueryFilter::default(),
        };
        let parcels = self.db.find_parcels(filter, Sort::descending(ParcelSortField::CreatedAt)).await?;
        trace!("📦️ Found {} parcels", parcels.len());
        Ok(parcels)
    }

    pub async fn parcel_by_id(&self, id: ParcelId) -> Result<Option<Parcel>, ParcelApiError> {
        Ok(self.db.fetch_parcel(id).await?)
    }

    pub async fn parcel_by_tracking_id(&self, tracking_id: &str) -> Result<Option<Parcel>, ParcelApiError> {
        let filter = ParcelQueryFilter::default().with_tracking_id(tracking_id);
        Ok(self.db.find_one_parcel(filter).await?)
    }

    /// Deletes the parcel, returning the number of parcels removed.
    pub async fn delete_parcel(&self, id: ParcelId) -> Result<u64, ParcelApiError> {
        let count = self.db.delete_parcel(id).await?;
        if count > 0 {
            info!("📦️ Parcel {id} deleted");
        }
        Ok(count)
    }
}
