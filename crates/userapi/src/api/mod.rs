//! HTTP API module.
//!
//! Provides the REST endpoints for user records.

mod error;
pub mod handlers;
pub mod pagination;
mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
