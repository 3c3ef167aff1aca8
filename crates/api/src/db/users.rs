//! User collection.

use async_trait::async_trait;

use bazaar_core::{Email, Password, UserId};

use super::{PgStore, RepositoryError, conflict_or_database};
use crate::models::User;

/// Repository for user documents.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by their exact email address.
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Insert a new user.
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    email: String,
    password: String,
    name: String,
    post_code: String,
    address: String,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: r.id,
            email,
            password: Password::new(r.password),
            name: r.name,
            post_code: r.post_code,
            address: r.address,
        })
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, email, password, name, post_code, address
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn insert_user(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, password, name, post_code, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(user.id)
        .bind(user.email.as_str())
        .bind(user.password.expose())
        .bind(&user.name)
        .bind(&user.post_code)
        .bind(&user.address)
        .execute(self.pool())
        .await
        .map_err(|e| conflict_or_database(e, "email"))?;

        Ok(())
    }
}
