//! Test utilities and common setup.
#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;
use userapi::api;
use userapi::db::Database;
use userapi::storage::{InMemoryUserStore, SqliteUserStore, StorageResult, UserStore};
use userapi::user::{User, UserPayload, UserService};

/// Which storage the app under test runs on.
#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Memory,
    Sqlite,
}

pub const BACKENDS: [Backend; 2] = [Backend::Memory, Backend::Sqlite];

/// A router plus direct access to the store behind it.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn UserStore>,
}

/// Create a test application on the given backend.
pub async fn test_app(backend: Backend) -> TestApp {
    let store: Arc<dyn UserStore> = match backend {
        Backend::Memory => Arc::new(InMemoryUserStore::new()),
        Backend::Sqlite => {
            let db = Database::in_memory().await.unwrap();
            Arc::new(SqliteUserStore::new(db.pool().clone()))
        }
    };

    let state = api::AppState::new(UserService::new(store.clone()));
    TestApp {
        router: api::create_router(state),
        store,
    }
}

/// Create a test application with `count` users already stored
/// (`User N` / `userN@example.com`, ids 1..=count).
pub async fn seeded_app(backend: Backend, count: usize) -> TestApp {
    let app = test_app(backend).await;
    for n in 1..=count {
        app.store
            .create(UserPayload::new(
                format!("User {n}"),
                format!("user{n}@example.com"),
            ))
            .await
            .unwrap();
    }
    app
}

impl TestApp {
    /// Send a request and return status plus parsed JSON body
    /// (`Value::Null` for an empty body).
    pub async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri).method(method);
        let body = match body {
            Some(text) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(text.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }
}

/// Store wrapper that counts every call reaching storage.
pub struct CountingStore {
    inner: InMemoryUserStore,
    pub calls: AtomicUsize,
}

impl CountingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryUserStore::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl UserStore for CountingStore {
    async fn get_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        self.hit();
        self.inner.get_by_id(id).await
    }

    async fn create(&self, user: UserPayload) -> StorageResult<User> {
        self.hit();
        self.inner.create(user).await
    }

    async fn list_paged(&self, limit: i64, offset: i64) -> StorageResult<(Vec<User>, i64)> {
        self.hit();
        self.inner.list_paged(limit, offset).await
    }

    async fn update(&self, user: &User) -> StorageResult<()> {
        self.hit();
        self.inner.update(user).await
    }

    async fn delete(&self, id: i64) -> StorageResult<()> {
        self.hit();
        self.inner.delete(id).await
    }
}

/// Create a test application whose store counts calls.
pub fn counting_app() -> (TestApp, Arc<CountingStore>) {
    let counting = Arc::new(CountingStore::new());
    let store: Arc<dyn UserStore> = counting.clone();
    let state = api::AppState::new(UserService::new(store.clone()));
    (
        TestApp {
            router: api::create_router(state),
            store,
        },
        counting,
    )
}
