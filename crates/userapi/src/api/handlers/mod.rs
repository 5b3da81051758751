//! API request handlers.
//!
//! - `users`: User CRUD and paginated listing
//! - `misc`: Health check

mod misc;
mod users;

pub use misc::{HealthResponse, health};
pub use users::{create_user, delete_user, get_user, list_users, patch_user, update_user};
