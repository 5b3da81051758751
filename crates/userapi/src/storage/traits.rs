//! Storage trait definitions.

use async_trait::async_trait;

use super::StorageResult;
use crate::user::{User, UserPayload};

/// Persistence contract for user records.
///
/// Implementations must be safe to call concurrently and must agree on
/// ordering: listings are always by ascending identifier.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user. `Ok(None)` when no record has this identifier.
    async fn get_by_id(&self, id: i64) -> StorageResult<Option<User>>;

    /// Persist a new user and return it with its assigned identifier.
    async fn create(&self, user: UserPayload) -> StorageResult<User>;

    /// Return up to `limit` users starting at `offset`, plus the total count.
    ///
    /// An offset past the end yields an empty page, not an error.
    async fn list_paged(&self, limit: i64, offset: i64) -> StorageResult<(Vec<User>, i64)>;

    /// Replace the record with `user.id`. Does nothing if it is absent.
    async fn update(&self, user: &User) -> StorageResult<()>;

    /// Remove the record with `id`. Does nothing if it is absent.
    async fn delete(&self, id: i64) -> StorageResult<()>;
}
