//! Unified error handling with Sentry integration.
//!
//! Every failure the storefront catches ends up as a `StorefrontError`.
//! [`StorefrontError::report`] logs it, captures external failures to
//! Sentry, and returns the single toast message the shopper sees. Nothing
//! propagates past the controller into the router.

use faucet_store_core::ProfileField;
use thiserror::Error;

use crate::backend::{BackendError, BackendErrorKind};
use crate::router::TransitionError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// A collaborator call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// A view template failed to render.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),

    /// Input was rejected before reaching a collaborator.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The profile lacks required fields.
    #[error("Profile incomplete: missing {0:?}")]
    ProfileIncomplete(Vec<ProfileField>),

    /// The action needs a signed-in session.
    #[error("Sign-in required")]
    SignInRequired,

    /// The action needs the admin claim.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The transition state machine saw an out-of-order event.
    #[error("Transition error: {0}")]
    Transition(#[from] TransitionError),
}

impl StorefrontError {
    /// The toast text for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(err) => match err.kind {
                BackendErrorKind::PermissionDenied
                | BackendErrorKind::InvalidArgument
                | BackendErrorKind::NotFound => err.message.clone(),
                BackendErrorKind::Unauthenticated => "Please sign in again.".to_owned(),
                BackendErrorKind::Unavailable => {
                    "Something went wrong. Please try again.".to_owned()
                }
            },
            Self::Render(_) | Self::Transition(_) => {
                "Something went wrong. Please try again.".to_owned()
            }
            Self::Validation(message) => message.clone(),
            Self::ProfileIncomplete(missing) => {
                let fields: Vec<&str> = missing.iter().map(ProfileField::label).collect();
                format!("Please complete your profile: {}", fields.join(", "))
            }
            Self::SignInRequired => "Please sign in to continue.".to_owned(),
            Self::Forbidden(_) => "Admin access required.".to_owned(),
        }
    }

    /// Whether this is a failure outside the shopper's control.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        match self {
            Self::Backend(err) => matches!(err.kind, BackendErrorKind::Unavailable),
            Self::Render(_) | Self::Transition(_) => true,
            _ => false,
        }
    }

    /// Log the error, capture external failures, and return the toast text.
    pub fn report(&self, context: &str) -> String {
        if self.is_external() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                context,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::warn!(error = %self, context, "Storefront action rejected");
        }
        self.user_message()
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

/// Set the Sentry user context.
///
/// Call this after sign-in to associate errors with the shopper.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Record a navigation breadcrumb for later error reports.
pub fn add_navigation_breadcrumb(path: &str) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some("navigation".to_owned()),
        message: Some(path.to_owned()),
        level: sentry::Level::Info,
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorefrontError::Validation("Price is required".to_owned());
        assert_eq!(err.to_string(), "Validation error: Price is required");
        assert_eq!(err.user_message(), "Price is required");
    }

    #[test]
    fn test_callable_messages_pass_through() {
        let err = StorefrontError::from(BackendError::permission_denied(
            "The function must be called by an admin.",
        ));
        assert_eq!(err.user_message(), "The function must be called by an admin.");
        assert!(!err.is_external());
    }

    #[test]
    fn test_unavailable_is_external_and_generic() {
        let err = StorefrontError::from(BackendError::unavailable("connection reset"));
        assert!(err.is_external());
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }

    #[test]
    fn test_profile_incomplete_lists_fields() {
        let err = StorefrontError::ProfileIncomplete(vec![ProfileField::Phone, ProfileField::City]);
        assert_eq!(
            err.user_message(),
            "Please complete your profile: Phone, City"
        );
    }
}
