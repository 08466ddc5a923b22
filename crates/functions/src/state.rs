//! Application state shared across handlers.

use std::sync::Arc;

use crate::directory::JsonDirectory;
use crate::roles::AdminRoles;

/// Application state shared across all handlers.
///
/// Cheaply cloneable; the role service holds its collaborators in `Arc`s.
#[derive(Clone)]
pub struct AppState {
    roles: AdminRoles,
}

impl AppState {
    #[must_use]
    pub const fn new(roles: AdminRoles) -> Self {
        Self { roles }
    }

    /// State over a single directory that also holds the roster.
    #[must_use]
    pub fn from_directory(directory: Arc<JsonDirectory>) -> Self {
        Self::new(AdminRoles::new(directory.clone(), directory))
    }

    #[must_use]
    pub const fn roles(&self) -> &AdminRoles {
        &self.roles
    }
}
