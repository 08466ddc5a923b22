//! Faucet Store callable functions.
//!
//! The privileged endpoints behind the storefront's admin panel. Every call
//! re-checks the caller's admin claim against the identity directory; the
//! storefront's own admin flag is never trusted here.
//!
//! # Modules
//!
//! - [`directory`] - identity directory and admin roster
//! - [`roles`] - grant, revoke and list the admin claim
//! - [`routes`] - axum handlers for the callable wire format

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod directory;
pub mod error;
pub mod roles;
pub mod routes;
pub mod state;

pub use config::FunctionsConfig;
pub use directory::{
    AdminRoster, Caller, DirectoryError, DirectoryUser, IdentityDirectory, JsonDirectory,
};
pub use error::CallableError;
pub use roles::AdminRoles;
pub use state::AppState;

/// The full application: callable routes plus Sentry request layers.
pub fn app(state: AppState) -> axum::Router {
    routes::routes()
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
