//! User service.

use std::sync::Arc;

use tracing::instrument;

use super::models::{User, UserPayload};
use crate::storage::{StorageResult, UserStore};

/// Seam between the HTTP layer and the store. Every call is forwarded
/// unchanged; validation lives in the handlers and constraints in storage.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    /// Create a new user service on top of `store`.
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: i64) -> StorageResult<Option<User>> {
        self.store.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn list_users_paged(&self, limit: i64, offset: i64) -> StorageResult<(Vec<User>, i64)> {
        self.store.list_paged(limit, offset).await
    }

    #[instrument(skip(self, user))]
    pub async fn create_user(&self, user: UserPayload) -> StorageResult<User> {
        self.store.create(user).await
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn update_user(&self, user: &User) -> StorageResult<()> {
        self.store.update(user).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: i64) -> StorageResult<()> {
        self.store.delete(id).await
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}
