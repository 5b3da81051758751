//! Storage abstraction layer.
//!
//! Provides a trait-based user store with implementations for:
//! - SQLite (durable, production)
//! - In-process map (tests and local development)

mod error;
mod memory;
mod sqlite;
mod traits;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::db::Database;

pub use error::{StorageError, StorageResult};
pub use memory::InMemoryUserStore;
pub use sqlite::SqliteUserStore;
pub use traits::UserStore;

/// Which backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite database file.
    #[default]
    Sqlite,
    /// Process-local map, lost on exit.
    Memory,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Sqlite => write!(f, "sqlite"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

/// Storage configuration resolved at startup.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Relational store on an already opened database.
    Sqlite(Database),
    /// Fresh in-memory store.
    Memory,
}

/// Create the store selected by `config`.
pub fn create_storage(config: StorageConfig) -> Arc<dyn UserStore> {
    match config {
        StorageConfig::Sqlite(db) => Arc::new(SqliteUserStore::new(db.pool().clone())),
        StorageConfig::Memory => Arc::new(InMemoryUserStore::new()),
    }
}
