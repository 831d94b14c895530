use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewUser, User, DEFAULT_USER_ROLE},
    traits::StoreError,
};

/// Inserts the user into the database, returning `false` in the second parameter if the email is already registered.
pub async fn idempotent_insert(user: NewUser, conn: &mut SqliteConnection) -> Result<(User, bool), StoreError> {
    if let Some(existing) = fetch_user_by_email(&user.email, &mut *conn).await? {
        return Ok((existing, false));
    }
    let email = user.email.clone();
    let result = sqlx::query_as::<_, User>(
        r#"
            INSERT INTO users (email, name, photo_url, role, created_at) VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(user.email)
    .bind(user.name)
    .bind(user.photo_url)
    .bind(DEFAULT_USER_ROLE)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await;
    match result {
        Ok(user) => {
            debug!("👤️ User {} inserted with id {}", user.email, user.id);
            Ok((user, true))
        },
        Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
            debug!("👤️ User {email} was registered concurrently");
            let existing =
                fetch_user_by_email(&email, conn).await?.ok_or(StoreError::UserAlreadyExists(email.clone()))?;
            Ok((existing, false))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_user_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as("SELECT * FROM users WHERE email = $1").bind(email).fetch_optional(conn).await?;
    Ok(user)
}
