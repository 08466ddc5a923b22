//! In-process collaborator implementations.
//!
//! These keep the storefront runnable and testable without the managed
//! backend. They follow the same contracts as the real services: products
//! come back ordered by name and orders newest first. The admin functions
//! stand-in is only built for tests (`test-support`).

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use faucet_store_core::{
    NewOrder, Order, OrderId, OrderUpdate, Product, ProductDraft, ProductId, Profile,
    SessionUser, UserId,
};
use tokio::sync::Mutex;

use super::{AuthProvider, BackendError, BlobStore, DocumentStore, IdToken, ImageUpload, Session};

// =============================================================================
// Authentication
// =============================================================================

/// Authentication provider backed by a fixed account.
pub struct MemoryAuth {
    account: Option<(SessionUser, String)>,
    admin_tokens: Mutex<HashSet<String>>,
    signed_in: AtomicBool,
}

impl MemoryAuth {
    /// Provider whose sign-in always yields `user` with `token`.
    #[must_use]
    pub fn new(user: SessionUser, token: &str, is_admin: bool) -> Self {
        let mut admin_tokens = HashSet::new();
        if is_admin {
            admin_tokens.insert(token.to_owned());
        }
        Self {
            account: Some((user, token.to_owned())),
            admin_tokens: Mutex::new(admin_tokens),
            signed_in: AtomicBool::new(false),
        }
    }

    /// Provider whose sign-in is always rejected (e.g. popup closed).
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            account: None,
            admin_tokens: Mutex::new(HashSet::new()),
            signed_in: AtomicBool::new(false),
        }
    }

    /// Whether a session is currently open.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.signed_in.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in(&self) -> Result<Session, BackendError> {
        let (user, token) = self
            .account
            .clone()
            .ok_or_else(|| BackendError::unavailable("sign-in popup closed"))?;
        self.signed_in.store(true, Ordering::SeqCst);
        Ok(Session {
            user,
            token: IdToken::new(token),
        })
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.signed_in.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn privilege_claim(&self, token: &IdToken) -> Result<bool, BackendError> {
        Ok(self.admin_tokens.lock().await.contains(token.expose()))
    }
}

// =============================================================================
// Document store
// =============================================================================

#[derive(Default)]
struct StoreData {
    profiles: HashMap<UserId, Profile>,
    orders: Vec<Order>,
    products: Vec<Product>,
}

/// Document store kept in memory.
#[derive(Default)]
pub struct MemoryDocumentStore {
    data: Mutex<StoreData>,
    unavailable: AtomicBool,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `products`.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            data: Mutex::new(StoreData {
                products,
                ..StoreData::default()
            }),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Insert a profile directly, bypassing the availability switch.
    pub async fn put_profile(&self, user: &UserId, profile: Profile) {
        self.data.lock().await.profiles.insert(user.clone(), profile);
    }

    /// Snapshot of every stored order, in creation order.
    pub async fn orders(&self) -> Vec<Order> {
        self.data.lock().await.orders.clone()
    }

    fn check(&self) -> Result<(), BackendError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(BackendError::unavailable("document store unreachable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get_profile(&self, user: &UserId) -> Result<Option<Profile>, BackendError> {
        self.check()?;
        Ok(self.data.lock().await.profiles.get(user).cloned())
    }

    async fn set_profile(&self, user: &UserId, profile: &Profile) -> Result<(), BackendError> {
        self.check()?;
        self.data
            .lock()
            .await
            .profiles
            .insert(user.clone(), profile.clone());
        Ok(())
    }

    async fn create_order(&self, order: &NewOrder) -> Result<OrderId, BackendError> {
        self.check()?;
        let id = OrderId::new(uuid::Uuid::new_v4().to_string());
        self.data
            .lock()
            .await
            .orders
            .push(order.clone().with_id(id.clone()));
        Ok(id)
    }

    async fn update_order(&self, id: &OrderId, update: OrderUpdate) -> Result<(), BackendError> {
        self.check()?;
        let mut data = self.data.lock().await;
        let order = data
            .orders
            .iter_mut()
            .find(|order| &order.id == id)
            .ok_or_else(|| BackendError::not_found(format!("order {id} not found")))?;
        order.apply(update, Utc::now()).map_err(|(from, to)| {
            BackendError::invalid_argument(format!("order {id} cannot move from {from} to {to}"))
        })
    }

    async fn list_orders(&self, user: &UserId) -> Result<Vec<Order>, BackendError> {
        self.check()?;
        let mut orders: Vec<Order> = self
            .data
            .lock()
            .await
            .orders
            .iter()
            .filter(|order| &order.user_id == user)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        self.check()?;
        let mut products = self.data.lock().await.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<ProductId, BackendError> {
        self.check()?;
        let id = ProductId::new(uuid::Uuid::new_v4().to_string());
        self.data
            .lock()
            .await
            .products
            .push(draft.into_product(id.clone(), Utc::now()));
        Ok(id)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        draft: ProductDraft,
    ) -> Result<(), BackendError> {
        self.check()?;
        let mut data = self.data.lock().await;
        let product = data
            .products
            .iter_mut()
            .find(|product| &product.id == id)
            .ok_or_else(|| BackendError::not_found(format!("product {id} not found")))?;
        *product = draft.apply_to(product, Utc::now());
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), BackendError> {
        self.check()?;
        let mut data = self.data.lock().await;
        let before = data.products.len();
        data.products.retain(|product| &product.id != id);
        if data.products.len() == before {
            return Err(BackendError::not_found(format!("product {id} not found")));
        }
        Ok(())
    }
}

// =============================================================================
// Blob storage
// =============================================================================

/// Blob store that keeps uploads in memory and hands out stable URLs.
pub struct MemoryBlobStore {
    public_base: String,
    blobs: Mutex<HashMap<String, ImageUpload>>,
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new(public_base: &str) -> Self {
        Self {
            public_base: public_base.trim_end_matches('/').to_owned(),
            blobs: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored uploads.
    pub async fn len(&self) -> usize {
        self.blobs.lock().await.len()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("memory://images")
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload_image(&self, file: ImageUpload) -> Result<String, BackendError> {
        if !file.content_type.starts_with("image/") {
            return Err(BackendError::invalid_argument(format!(
                "{} is not an image",
                file.file_name
            )));
        }
        let key = format!("{}-{}", uuid::Uuid::new_v4(), file.file_name);
        let url = format!("{}/{key}", self.public_base);
        self.blobs.lock().await.insert(key, file);
        Ok(url)
    }
}

// =============================================================================
// Admin functions
// =============================================================================

#[cfg(any(test, feature = "test-support"))]
pub use admin_functions::MemoryAdminFunctions;

/// Callable service stand-in for storefront tests. Cross-crate tests use the
/// real role service from `faucet-store-functions` instead.
#[cfg(any(test, feature = "test-support"))]
mod admin_functions {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use crate::backend::{AdminFunctions, BackendError, IdToken};

    struct DirectoryEntry {
        token: Option<String>,
        admin: bool,
    }

    /// Admin role endpoints evaluated in-process.
    ///
    /// Known users are registered with [`MemoryAdminFunctions::register`]; the
    /// caller's claim is looked up from its token on every call.
    #[derive(Default)]
    pub struct MemoryAdminFunctions {
        users: Mutex<HashMap<String, DirectoryEntry>>,
        roster: Mutex<Vec<String>>,
    }

    impl MemoryAdminFunctions {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a user by email, optionally with a session token.
        pub async fn register(&self, email: &str, token: Option<&str>, admin: bool) {
            let email = email.trim().to_lowercase();
            if admin {
                let mut roster = self.roster.lock().await;
                if !roster.contains(&email) {
                    roster.push(email.clone());
                }
            }
            self.users.lock().await.insert(
                email,
                DirectoryEntry {
                    token: token.map(str::to_owned),
                    admin,
                },
            );
        }

        /// Current roster, in insertion order.
        pub async fn roster(&self) -> Vec<String> {
            self.roster.lock().await.clone()
        }

        async fn require_admin(&self, caller: &IdToken) -> Result<(), BackendError> {
            let users = self.users.lock().await;
            let is_admin = users
                .values()
                .any(|entry| entry.admin && entry.token.as_deref() == Some(caller.expose()));
            if is_admin {
                Ok(())
            } else {
                Err(BackendError::permission_denied(
                    "The function must be called by an admin.",
                ))
            }
        }

        async fn set_claim(&self, email: &str, admin: bool) -> Result<String, BackendError> {
            let email = email.trim().to_lowercase();
            if email.is_empty() {
                return Err(BackendError::invalid_argument("Email required."));
            }
            let mut users = self.users.lock().await;
            let entry = users
                .get_mut(&email)
                .ok_or_else(|| BackendError::not_found("User not found."))?;
            entry.admin = admin;
            let mut roster = self.roster.lock().await;
            roster.retain(|existing| existing != &email);
            if admin {
                roster.push(email.clone());
            }
            Ok(email)
        }
    }

    #[async_trait]
    impl AdminFunctions for MemoryAdminFunctions {
        async fn add_admin_role(
            &self,
            caller: &IdToken,
            email: &str,
        ) -> Result<String, BackendError> {
            self.require_admin(caller).await?;
            let email = self.set_claim(email, true).await?;
            Ok(format!("Success! {email} is now an admin."))
        }

        async fn remove_admin_role(
            &self,
            caller: &IdToken,
            email: &str,
        ) -> Result<String, BackendError> {
            self.require_admin(caller).await?;
            let email = self.set_claim(email, false).await?;
            Ok(format!("Success! {email} is no longer an admin."))
        }

        async fn list_admins(&self, caller: &IdToken) -> Result<Vec<String>, BackendError> {
            self.require_admin(caller).await?;
            Ok(self.roster().await)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use faucet_store_core::{Category, Price};

    use super::*;
    use crate::backend::{AdminFunctions, BackendErrorKind};

    fn draft(name: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_owned(),
            price: Price::from_minor(1_000),
            image: None,
            description: String::new(),
            category: Category::Accessories,
            details: None,
            specs: None,
            stock: None,
            active: true,
        }
    }

    #[tokio::test]
    async fn test_products_are_listed_by_name() {
        let store = MemoryDocumentStore::new();
        store.create_product(draft("Shower Caddy")).await.unwrap();
        store.create_product(draft("Aerator")).await.unwrap();
        let names: Vec<String> = store
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Aerator", "Shower Caddy"]);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = MemoryDocumentStore::new();
        store.set_unavailable(true);
        let err = store.list_products().await.unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::Unavailable);
        store.set_unavailable(false);
        assert!(store.list_products().await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let store = MemoryDocumentStore::new();
        let err = store.delete_product(&ProductId::new("nope")).await.unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_blob_store_rejects_non_images() {
        let blobs = MemoryBlobStore::default();
        let err = blobs
            .upload_image(ImageUpload {
                file_name: "notes.txt".to_owned(),
                content_type: "text/plain".to_owned(),
                bytes: vec![1, 2, 3],
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::InvalidArgument);

        let url = blobs
            .upload_image(ImageUpload {
                file_name: "faucet.jpg".to_owned(),
                content_type: "image/jpeg".to_owned(),
                bytes: vec![0xFF, 0xD8],
            })
            .await
            .unwrap();
        assert!(url.starts_with("memory://images/"));
        assert!(url.ends_with("-faucet.jpg"));
        assert_eq!(blobs.len().await, 1);
    }

    #[tokio::test]
    async fn test_admin_functions_recheck_caller() {
        let functions = MemoryAdminFunctions::new();
        functions.register("root@store.io", Some("root-token"), true).await;
        functions.register("staff@store.io", Some("staff-token"), false).await;

        let err = functions
            .add_admin_role(&IdToken::new("staff-token"), "staff@store.io")
            .await
            .unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::PermissionDenied);
        assert_eq!(functions.roster().await, vec!["root@store.io"]);

        let message = functions
            .add_admin_role(&IdToken::new("root-token"), "Staff@Store.io")
            .await
            .unwrap();
        assert_eq!(message, "Success! staff@store.io is now an admin.");
        assert_eq!(
            functions.list_admins(&IdToken::new("staff-token")).await.unwrap(),
            vec!["root@store.io", "staff@store.io"]
        );
    }

    #[tokio::test]
    async fn test_memory_auth_claims() {
        let user = SessionUser {
            id: UserId::new("u1"),
            email: faucet_store_core::Email::parse("a@b.co").unwrap(),
            name: "A".to_owned(),
            avatar: None,
        };
        let auth = MemoryAuth::new(user, "tok", true);
        let session = auth.sign_in().await.unwrap();
        assert!(auth.is_signed_in());
        assert!(auth.privilege_claim(&session.token).await.unwrap());
        assert!(!auth.privilege_claim(&IdToken::new("other")).await.unwrap());
        assert!(MemoryAuth::rejecting().sign_in().await.is_err());
    }
}
