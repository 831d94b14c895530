use crate::{
    db_types::{NewParcel, Parcel, ParcelId},
    traits::{
        data_objects::{ParcelSortField, Sort, UpdateResult},
        StoreError,
    },
    zse_api::parcel_objects::{ParcelQueryFilter, ParcelUpdate},
};

/// Typed access to the parcel collection.
///
/// Parcels are created unpaid by their sender and are marked as paid exactly once, by the reconciliation flow.
#[allow(async_fn_in_trait)]
pub trait ParcelManagement {
    /// Stores a new, unpaid parcel and returns it with its store-assigned id.
    async fn insert_parcel(&self, parcel: NewParcel) -> Result<Parcel, StoreError>;

    /// Fetches the parcel with the given id. If no parcel exists, `None` is returned.
    async fn fetch_parcel(&self, id: ParcelId) -> Result<Option<Parcel>, StoreError>;

    /// Returns the first parcel matching the filter, in id order.
    async fn find_one_parcel(&self, filter: ParcelQueryFilter) -> Result<Option<Parcel>, StoreError>;

    async fn find_parcels(
        &self,
        filter: ParcelQueryFilter,
        sort: Sort<ParcelSortField>,
    ) -> Result<Vec<Parcel>, StoreError>;

    /// Applies a partial update. Only the fields set in `update` are written. An empty update is rejected with
    /// [`StoreError::UpdateNoOp`].
    async fn update_parcel(&self, id: ParcelId, update: ParcelUpdate) -> Result<UpdateResult, StoreError>;

    /// Deletes the parcel and returns the number of records removed (0 or 1).
    async fn delete_parcel(&self, id: ParcelId) -> Result<u64, StoreError>;
}
