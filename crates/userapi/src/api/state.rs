//! Application state shared across handlers.

use crate::user::UserService;

/// Application state shared across handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// User service.
    pub users: UserService,
}

impl AppState {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}
