//! User records API library.
//!
//! Provides the storage port with its SQLite and in-memory backends, the user
//! service, and the HTTP layer that exposes them.

pub mod api;
pub mod db;
pub mod storage;
pub mod user;
