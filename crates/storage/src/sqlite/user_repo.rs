use lectio_core::model::UserId;

use super::SqliteRepository;
use super::mapping::map_user_row;
use crate::repository::{NewUserRecord, StorageError, UserRepository, UserRecord};

/// SQLite reports a violated UNIQUE constraint as a database error; surface
/// the duplicate-email case as `Conflict` so the auth layer can turn it into
/// a user-facing message.
fn insert_error(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}

#[async_trait::async_trait]
impl UserRepository for SqliteRepository {
    async fn insert_user(&self, user: NewUserRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(user.id.to_string())
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.created_at)
        .execute(self.pool())
        .await
        .map_err(insert_error)?;

        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = ?1
            ",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.map(|row| map_user_row(&row)).transpose()
    }

    async fn get_user(&self, id: UserId) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.map(|row| map_user_row(&row)).transpose()
    }
}
