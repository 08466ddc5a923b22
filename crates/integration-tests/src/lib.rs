//! Integration test harness for Faucet Store.
//!
//! Wires a storefront to the callable functions service two ways:
//!
//! - [`spawn_functions`] serves the real HTTP app on an ephemeral port, for
//!   use with the storefront's `CallableClient`
//! - [`InProcessFunctions`] calls the role service directly
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p faucet-store-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use faucet_store_core::{Email, SessionUser, UserId};
use faucet_store_functions::{AdminRoles, AppState, CallableError, DirectoryUser, JsonDirectory};
use faucet_store_storefront::Storefront;
use faucet_store_storefront::StorefrontConfig;
use faucet_store_storefront::backend::memory::{MemoryAuth, MemoryBlobStore, MemoryDocumentStore};
use faucet_store_storefront::backend::payment::SimulatedPayment;
use faucet_store_storefront::backend::{
    AdminFunctions, BackendError, BackendErrorKind, Backends, IdToken,
};
use faucet_store_storefront::catalog::seed::demo_products;
use faucet_store_storefront::host::HeadlessHost;
use tokio::task::JoinHandle;
use url::Url;

/// Token of the seeded admin account.
pub const ROOT_TOKEN: &str = "tok-root";
/// Token of the seeded shopper account.
pub const SHOPPER_TOKEN: &str = "tok-shopper";

/// A directory with one admin (`root@example.com`), one shopper
/// (`shopper@example.com`) and one user with no session
/// (`friend@example.com`).
#[must_use]
pub fn seeded_directory() -> Arc<JsonDirectory> {
    Arc::new(JsonDirectory::in_memory(vec![
        DirectoryUser::new("u-root", "root@example.com")
            .with_token(ROOT_TOKEN)
            .with_admin(true),
        DirectoryUser::new("u-shopper", "shopper@example.com").with_token(SHOPPER_TOKEN),
        DirectoryUser::new("u-friend", "friend@example.com"),
    ]))
}

/// Serve the functions app on `127.0.0.1` at an ephemeral port.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn spawn_functions(
    directory: Arc<JsonDirectory>,
) -> std::io::Result<(Url, JoinHandle<std::io::Result<()>>)> {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    let app = faucet_store_functions::app(AppState::from_directory(directory));
    let handle = tokio::spawn(async move { axum::serve(listener, app).await });
    let url = Url::parse(&format!("http://{addr}/"))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    Ok((url, handle))
}

/// The role service called without HTTP.
pub struct InProcessFunctions {
    roles: AdminRoles,
}

impl InProcessFunctions {
    #[must_use]
    pub fn new(directory: Arc<JsonDirectory>) -> Self {
        Self {
            roles: AdminRoles::new(directory.clone(), directory),
        }
    }
}

fn to_backend(error: CallableError) -> BackendError {
    BackendError::new(BackendErrorKind::from(error.code()), error.to_string())
}

#[async_trait]
impl AdminFunctions for InProcessFunctions {
    async fn add_admin_role(&self, caller: &IdToken, email: &str) -> Result<String, BackendError> {
        let caller = self.roles.caller(Some(caller.expose())).await.map_err(to_backend)?;
        self.roles
            .add_admin_role(caller.as_ref(), Some(email))
            .await
            .map_err(to_backend)
    }

    async fn remove_admin_role(
        &self,
        caller: &IdToken,
        email: &str,
    ) -> Result<String, BackendError> {
        let caller = self.roles.caller(Some(caller.expose())).await.map_err(to_backend)?;
        self.roles
            .remove_admin_role(caller.as_ref(), Some(email))
            .await
            .map_err(to_backend)
    }

    async fn list_admins(&self, caller: &IdToken) -> Result<Vec<String>, BackendError> {
        let caller = self.roles.caller(Some(caller.expose())).await.map_err(to_backend)?;
        self.roles
            .list_admins(caller.as_ref())
            .await
            .map_err(to_backend)
    }
}

/// Session identity for one of the seeded accounts.
///
/// # Panics
///
/// Panics if `email` is not a valid address.
#[must_use]
#[allow(clippy::expect_used)]
pub fn session_user(uid: &str, email: &str, name: &str) -> SessionUser {
    SessionUser {
        id: UserId::new(uid),
        email: Email::parse(email).expect("valid test email"),
        name: name.to_owned(),
        avatar: None,
    }
}

/// A storefront over in-memory stores, the given auth and functions.
pub struct TestStorefront {
    pub app: Storefront<HeadlessHost>,
    pub store: Arc<MemoryDocumentStore>,
}

impl TestStorefront {
    /// Build a storefront starting at `path`.
    #[must_use]
    pub fn new(path: &str, auth: MemoryAuth, functions: Arc<dyn AdminFunctions>) -> Self {
        let store = Arc::new(MemoryDocumentStore::with_products(demo_products()));
        let backends = Backends {
            auth: Arc::new(auth),
            store: store.clone(),
            blobs: Arc::new(MemoryBlobStore::default()),
            payments: Arc::new(SimulatedPayment::approving(Duration::from_millis(1500))),
            functions,
        };
        let app = Storefront::new(StorefrontConfig::default(), backends, HeadlessHost::at(path));
        Self { app, store }
    }

    /// Messages of every toast shown so far.
    #[must_use]
    pub fn toasts(&self) -> Vec<String> {
        self.app
            .host()
            .toast_messages()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// The most recent toast, if any.
    #[must_use]
    pub fn last_toast(&self) -> Option<String> {
        self.toasts().pop()
    }
}
