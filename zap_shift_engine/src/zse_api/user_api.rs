use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewUser, User},
    traits::UserManagement,
    zse_api::errors::UserApiError,
};

pub struct UserApi<B> {
    db: B,
}

impl<B: Debug> Debug for UserApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UserApi ({:?})", self.db)
    }
}

impl<B> UserApi<B>
where B: UserManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Registers a user with the default role. Registering an email that already exists returns the existing record
    /// and `false`.
    pub async fn register_user(&self, user: NewUser) -> Result<(User, bool), UserApiError> {
        if user.email.trim().is_empty() {
            return Err(UserApiError::InvalidUser("An email address is required".into()));
        }
        let (user, created) = self.db.insert_user(user).await?;
        if created {
            info!("👤️ New user {} registered", user.email);
        } else {
            debug!("👤️ User {} already exists", user.email);
        }
        Ok((user, created))
    }

    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, UserApiError> {
        Ok(self.db.fetch_user_by_email(email).await?)
    }
}
