//! Callable error responses with Sentry integration.
//!
//! Every handler returns `Result<T, CallableError>`. Failures are sent as
//! `{"error": {"status": "<CODE>", "message": "..."}}` with the matching
//! HTTP status; directory failures are captured to Sentry first.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use faucet_store_core::CallableCode;
use serde::Serialize;
use thiserror::Error;

use crate::directory::DirectoryError;

/// A rejected callable invocation.
#[derive(Debug, Error)]
pub enum CallableError {
    /// The caller lacks the admin claim.
    #[error("{0}")]
    PermissionDenied(String),

    /// A required argument is missing or malformed.
    #[error("{0}")]
    InvalidArgument(String),

    /// The target user does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The credential could not be read.
    #[error("{0}")]
    Unauthenticated(String),

    /// The directory failed.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),
}

impl CallableError {
    #[must_use]
    pub const fn code(&self) -> CallableCode {
        match self {
            Self::PermissionDenied(_) => CallableCode::PermissionDenied,
            Self::InvalidArgument(_) => CallableCode::InvalidArgument,
            Self::NotFound(_) => CallableCode::NotFound,
            Self::Unauthenticated(_) => CallableCode::Unauthenticated,
            Self::Directory(_) => CallableCode::Internal,
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: CallableCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

impl IntoResponse for CallableError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Directory(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Callable error"
            );
        } else {
            tracing::warn!(code = %self.code(), error = %self, "Callable rejected");
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Directory(_) => "Internal error.".to_owned(),
            _ => self.to_string(),
        };

        let body = ErrorEnvelope {
            error: ErrorBody {
                status: self.code(),
                message,
            },
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `CallableError`.
pub type Result<T> = std::result::Result<T, CallableError>;
