//! Collaborator ports for the managed backend.
//!
//! # Architecture
//!
//! Authentication, the document store, blob storage, payment settlement and
//! the privileged callable endpoints all live outside this crate. The
//! storefront only depends on the traits below; concrete adapters are:
//!
//! - [`memory`] - in-process implementations for tests and local runs
//! - [`payment::SimulatedPayment`] - fixed-delay payment confirmation
//! - [`callable::CallableClient`] - HTTP client for the functions service
//!
//! Every port reports failures as a [`BackendError`] whose
//! [`BackendErrorKind`] follows the storefront's error taxonomy.

pub mod callable;
pub mod memory;
pub mod payment;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use faucet_store_core::{
    CallableCode, NewOrder, Order, OrderId, OrderUpdate, Price, Product, ProductDraft, ProductId,
    Profile, SessionUser, UserId,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

pub use payment::{PaymentDetails, PaymentOutcome};

/// Category of a backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendErrorKind {
    /// Caller lacks the required privilege.
    PermissionDenied,
    /// A required argument was missing or malformed.
    InvalidArgument,
    /// The referenced record does not exist.
    NotFound,
    /// No valid session was presented.
    Unauthenticated,
    /// Network or store failure.
    Unavailable,
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PermissionDenied => "permission-denied",
            Self::InvalidArgument => "invalid-argument",
            Self::NotFound => "not-found",
            Self::Unauthenticated => "unauthenticated",
            Self::Unavailable => "unavailable",
        };
        f.write_str(s)
    }
}

impl From<CallableCode> for BackendErrorKind {
    fn from(code: CallableCode) -> Self {
        match code {
            CallableCode::PermissionDenied => Self::PermissionDenied,
            CallableCode::InvalidArgument => Self::InvalidArgument,
            CallableCode::NotFound => Self::NotFound,
            CallableCode::Unauthenticated => Self::Unauthenticated,
            CallableCode::Internal => Self::Unavailable,
        }
    }
}

/// A failed call to an external collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    /// Create an error of the given kind.
    #[must_use]
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::PermissionDenied, message)
    }

    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::InvalidArgument, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::NotFound, message)
    }

    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Unavailable, message)
    }
}

/// Bearer token identifying the signed-in session to privileged endpoints.
#[derive(Clone)]
pub struct IdToken(SecretString);

impl IdToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Reveal the raw token for an outgoing request.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for IdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdToken([REDACTED])")
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
    pub token: IdToken,
}

/// An image selected in the admin product form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Authentication provider.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Run the interactive sign-in flow.
    async fn sign_in(&self) -> Result<Session, BackendError>;

    /// End the current session.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Whether the session carries the admin privilege claim.
    async fn privilege_claim(&self, token: &IdToken) -> Result<bool, BackendError>;
}

/// Document store holding profiles, orders and the catalog.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_profile(&self, user: &UserId) -> Result<Option<Profile>, BackendError>;

    async fn set_profile(&self, user: &UserId, profile: &Profile) -> Result<(), BackendError>;

    /// Persist a new order and return its generated id.
    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, BackendError>;

    async fn update_order(&self, id: &OrderId, update: OrderUpdate) -> Result<(), BackendError>;

    /// Orders of one user, newest first.
    async fn list_orders(&self, user: &UserId) -> Result<Vec<Order>, BackendError>;

    /// The full catalog ordered by name.
    async fn list_products(&self) -> Result<Vec<Product>, BackendError>;

    async fn create_product(&self, draft: ProductDraft) -> Result<ProductId, BackendError>;

    async fn update_product(&self, id: &ProductId, draft: ProductDraft)
    -> Result<(), BackendError>;

    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError>;
}

/// Blob storage for product images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload an image and return its public URL.
    async fn upload_image(&self, file: ImageUpload) -> Result<String, BackendError>;
}

/// Payment settlement.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn confirm(
        &self,
        order: &OrderId,
        amount: Price,
        details: &PaymentDetails,
    ) -> Result<PaymentOutcome, BackendError>;
}

/// Privileged callable endpoints for admin role management.
///
/// Implementations must not trust the client's admin flag: the service
/// re-checks the caller's privilege claim from the token.
#[async_trait]
pub trait AdminFunctions: Send + Sync {
    /// Grant the admin claim; returns the confirmation message.
    async fn add_admin_role(&self, caller: &IdToken, email: &str) -> Result<String, BackendError>;

    /// Revoke the admin claim; returns the confirmation message.
    async fn remove_admin_role(&self, caller: &IdToken, email: &str)
    -> Result<String, BackendError>;

    /// Emails on the admin roster.
    async fn list_admins(&self, caller: &IdToken) -> Result<Vec<String>, BackendError>;
}

/// The set of collaborators a storefront session talks to.
#[derive(Clone)]
pub struct Backends {
    pub auth: Arc<dyn AuthProvider>,
    pub store: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub payments: Arc<dyn PaymentGateway>,
    pub functions: Arc<dyn AdminFunctions>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callable_codes_map_to_kinds() {
        assert_eq!(
            BackendErrorKind::from(CallableCode::PermissionDenied),
            BackendErrorKind::PermissionDenied
        );
        assert_eq!(
            BackendErrorKind::from(CallableCode::Internal),
            BackendErrorKind::Unavailable
        );
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = IdToken::new("very-secret");
        assert_eq!(format!("{token:?}"), "IdToken([REDACTED])");
        assert_eq!(token.expose(), "very-secret");
    }

    #[test]
    fn test_error_display() {
        let err = BackendError::not_found("User not found.");
        assert_eq!(err.to_string(), "not-found: User not found.");
    }
}
