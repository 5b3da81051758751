//! In-memory user store for tests and local development.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::{StorageError, StorageResult, UserStore};
use crate::user::{User, UserPayload};

/// Map and id counter live behind one lock so assignment can't race.
#[derive(Debug)]
struct Inner {
    users: BTreeMap<i64, User>,
    next_id: i64,
}

impl Inner {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }
}

/// Volatile user store. Mirrors the relational table: ascending ids that are
/// never handed out twice, and unique e-mail addresses.
#[derive(Debug)]
pub struct InMemoryUserStore {
    inner: Mutex<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                users: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicate_email(email: &str) -> StorageError {
    StorageError::Constraint(format!("UNIQUE constraint failed: users.email ({email})"))
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.users.get(&id).cloned())
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: UserPayload) -> StorageResult<User> {
        let mut inner = self.inner.lock().await;
        if inner.email_taken(&user.email, None) {
            return Err(duplicate_email(&user.email));
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let user = user.with_id(id);
        inner.users.insert(id, user.clone());
        debug!(user_id = id, "Inserted user");

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_paged(&self, limit: i64, offset: i64) -> StorageResult<(Vec<User>, i64)> {
        let inner = self.inner.lock().await;
        let total = inner.users.len() as i64;

        if limit <= 0 || offset < 0 || offset >= total {
            return Ok((Vec::new(), total));
        }

        let users = inner
            .users
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok((users, total))
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    async fn update(&self, user: &User) -> StorageResult<()> {
        let mut inner = self.inner.lock().await;
        if !inner.users.contains_key(&user.id) {
            debug!("Update of absent user ignored");
            return Ok(());
        }
        if inner.email_taken(&user.email, Some(user.id)) {
            return Err(duplicate_email(&user.email));
        }

        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> StorageResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.users.remove(&id).is_none() {
            debug!("Delete of absent user ignored");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::conformance;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_and_get() {
        conformance::create_and_get(&InMemoryUserStore::new()).await;
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        conformance::get_missing_is_none(&InMemoryUserStore::new()).await;
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        conformance::ids_not_reused_after_delete(&InMemoryUserStore::new()).await;
    }

    #[tokio::test]
    async fn test_list_paged_ordering() {
        conformance::list_paged_ordering(&InMemoryUserStore::new()).await;
    }

    #[tokio::test]
    async fn test_list_paged_past_end() {
        conformance::list_paged_past_end(&InMemoryUserStore::new()).await;
    }

    #[tokio::test]
    async fn test_update_replaces() {
        conformance::update_replaces(&InMemoryUserStore::new()).await;
    }

    #[tokio::test]
    async fn test_update_missing_is_noop() {
        conformance::update_missing_is_noop(&InMemoryUserStore::new()).await;
    }

    #[tokio::test]
    async fn test_delete_removes_and_missing_is_noop() {
        conformance::delete_removes_and_missing_is_noop(&InMemoryUserStore::new()).await;
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        conformance::duplicate_email_rejected(&InMemoryUserStore::new()).await;
    }

    #[tokio::test]
    async fn test_update_to_taken_email_rejected() {
        conformance::update_to_taken_email_rejected(&InMemoryUserStore::new()).await;
    }

    #[tokio::test]
    async fn test_operations_are_traced() {
        conformance::operations_are_traced(&InMemoryUserStore::new()).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = Arc::new(InMemoryUserStore::new());

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create(UserPayload::new(
                            format!("user{i}"),
                            format!("user{i}@example.com"),
                        ))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 50);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&50));
    }
}
