//! User management module.
//!
//! Provides the user data model, request payloads, and the service that
//! fronts the storage port.

mod models;
mod service;

pub use models::{User, UserPage, UserPatch, UserPayload, is_valid_email};
pub use service::UserService;
