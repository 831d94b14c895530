use crate::{
    db_types::{NewUser, User},
    traits::StoreError,
};

#[allow(async_fn_in_trait)]
pub trait UserManagement {
    /// Registers a user. This call is idempotent on the email address.
    /// Returns the user record, and `true` if it was created by this call or `false` if it already existed.
    async fn insert_user(&self, user: NewUser) -> Result<(User, bool), StoreError>;

    async fn fetch_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}
