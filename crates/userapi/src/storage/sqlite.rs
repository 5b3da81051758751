//! SQLite-backed user store.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::{StorageError, StorageResult, UserStore};
use crate::user::{User, UserPayload};

/// Relational user store. Identifier assignment and e-mail uniqueness are
/// left to the table's primary key and unique index.
#[derive(Debug, Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for SqliteUserStore {
    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: UserPayload) -> StorageResult<User> {
        let result = sqlx::query("INSERT INTO users (name, email) VALUES (?, ?)")
            .bind(&user.name)
            .bind(&user.email)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;

        let id = result.last_insert_rowid();
        debug!(user_id = id, "Inserted user");

        Ok(user.with_id(id))
    }

    #[instrument(skip(self))]
    async fn list_paged(&self, limit: i64, offset: i64) -> StorageResult<(Vec<User>, i64)> {
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;

        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email FROM users ORDER BY id ASC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::from_sqlx)?;

        Ok((users, total.0))
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn update(&self, user: &User) -> StorageResult<()> {
        let result = sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;

        debug!(rows = result.rows_affected(), "Updated user");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::from_sqlx)?;

        debug!(rows = result.rows_affected(), "Deleted user");
        Ok(())
    }
}
