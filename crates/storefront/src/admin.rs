//! Admin session gate and admin console operations.
//!
//! The flag resolved here only decides what the storefront renders. The
//! callable endpoints re-check the caller's claim from its token, so a
//! forged or stale flag cannot grant anything by itself.

use std::str::FromStr;
use std::sync::Arc;

use faucet_store_core::{Category, Price, Product, ProductDraft, ProductId, ProductSpecs};
use tracing::instrument;

use crate::backend::{
    AdminFunctions, AuthProvider, BackendError, BlobStore, DocumentStore, IdToken, ImageUpload,
    Session,
};
use crate::catalog::CatalogCache;
use crate::error::{Result, StorefrontError};

/// Whether the current session holds the admin claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminFlag {
    /// Claim not checked yet; treated as non-admin.
    #[default]
    Unresolved,
    Resolved(bool),
}

impl AdminFlag {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Resolved(true))
    }
}

/// Ask the auth provider for the session's privilege claim.
///
/// A failed check resolves to non-admin.
#[instrument(skip(auth, token))]
pub async fn resolve_flag(auth: &dyn AuthProvider, token: &IdToken) -> AdminFlag {
    match auth.privilege_claim(token).await {
        Ok(is_admin) => AdminFlag::Resolved(is_admin),
        Err(e) => {
            tracing::warn!(error = %e, "privilege claim check failed, treating as non-admin");
            AdminFlag::Resolved(false)
        }
    }
}

/// Short-circuit unless a signed-in session carries the admin flag.
///
/// # Errors
///
/// Returns [`StorefrontError::SignInRequired`] without a session and
/// [`StorefrontError::Forbidden`] without the flag.
pub fn require_admin(session: Option<&Session>, flag: AdminFlag) -> Result<&Session> {
    let session = session.ok_or(StorefrontError::SignInRequired)?;
    if flag.is_admin() {
        Ok(session)
    } else {
        Err(StorefrontError::Forbidden(format!(
            "{} is not an admin",
            session.user.email
        )))
    }
}

/// Raw values of the admin product form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub details: String,
    pub material: String,
    pub finish: String,
    pub dimensions: String,
    pub warranty: String,
    /// One feature per line.
    pub features: String,
    pub stock: String,
    pub active: bool,
    /// Newly selected image, uploaded before the product is saved.
    pub image: Option<ImageUpload>,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl ProductForm {
    /// Prefill the form for editing.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        let specs = product.specs.clone().unwrap_or_default();
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            category: product.category.slug().to_owned(),
            details: product.details.clone().unwrap_or_default(),
            material: specs.material.unwrap_or_default(),
            finish: specs.finish.unwrap_or_default(),
            dimensions: specs.dimensions.unwrap_or_default(),
            warranty: specs.warranty.unwrap_or_default(),
            features: specs.features.join("\n"),
            stock: product.stock.map(|s| s.to_string()).unwrap_or_default(),
            active: product.active,
            image: None,
        }
    }

    /// Validate into a draft. The image URL is filled in after upload.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Validation`] listing every invalid field.
    pub fn validate(&self) -> Result<ProductDraft> {
        let mut problems = Vec::new();

        let name = non_blank(&self.name);
        if name.is_none() {
            problems.push("Name is required.".to_owned());
        }
        let price = Price::parse(self.price.trim())
            .map_err(|e| problems.push(format!("Price: {e}.")))
            .ok();
        let category = Category::from_str(self.category.trim())
            .map_err(|e| problems.push(format!("Category: {e}.")))
            .ok();
        let stock = match non_blank(&self.stock) {
            None => None,
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    problems.push("Stock must be a whole number.".to_owned());
                    None
                }
            },
        };

        let (Some(name), Some(price), Some(category)) = (name, price, category) else {
            return Err(StorefrontError::Validation(problems.join(" ")));
        };
        if !problems.is_empty() {
            return Err(StorefrontError::Validation(problems.join(" ")));
        }

        let features: Vec<String> = self.features.lines().filter_map(non_blank).collect();
        let specs = ProductSpecs {
            material: non_blank(&self.material),
            finish: non_blank(&self.finish),
            dimensions: non_blank(&self.dimensions),
            warranty: non_blank(&self.warranty),
            features,
        };
        let has_specs = specs != ProductSpecs::default();

        Ok(ProductDraft {
            name,
            price,
            image: None,
            description: self.description.trim().to_owned(),
            category,
            details: non_blank(&self.details),
            specs: has_specs.then_some(specs),
            stock,
            active: self.active,
        })
    }
}

/// Product and role management on behalf of a gated admin session.
#[derive(Clone)]
pub struct AdminConsole {
    store: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
    functions: Arc<dyn AdminFunctions>,
    catalog: CatalogCache,
}

impl AdminConsole {
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        functions: Arc<dyn AdminFunctions>,
        catalog: CatalogCache,
    ) -> Self {
        Self {
            store,
            blobs,
            functions,
            catalog,
        }
    }

    /// Create (`id == None`) or update a product from the form.
    ///
    /// A selected image is uploaded first; an update without a new image
    /// keeps the stored one.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any call is made, or the first
    /// failing collaborator's error.
    #[instrument(skip(self, form))]
    pub async fn save_product(
        &self,
        id: Option<&ProductId>,
        form: &ProductForm,
    ) -> Result<ProductId> {
        let mut draft = form.validate()?;
        if let Some(upload) = form.image.clone() {
            draft.image = Some(self.blobs.upload_image(upload).await?);
        }

        let id = match id {
            Some(id) => {
                self.store.update_product(id, draft).await?;
                id.clone()
            }
            None => self.store.create_product(draft).await?,
        };
        self.catalog.invalidate().await;
        tracing::info!(product_id = %id, "product saved");
        Ok(id)
    }

    /// Permanently remove a product from the catalog.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<()> {
        self.store.delete_product(id).await?;
        self.catalog.invalidate().await;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Flip a product's active flag. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown id, or the store's error.
    #[instrument(skip(self))]
    pub async fn toggle_product_status(&self, id: &ProductId) -> Result<bool> {
        let product = self
            .catalog
            .find(id)
            .await?
            .ok_or_else(|| BackendError::not_found("Product not found."))?;
        let mut draft = ProductDraft::from(&product);
        draft.active = !product.active;
        let active = draft.active;
        self.store.update_product(id, draft).await?;
        self.catalog.invalidate().await;
        tracing::info!(product_id = %id, active, "product status toggled");
        Ok(active)
    }

    /// Grant the admin claim through the callable endpoint.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank email, or the endpoint's
    /// error.
    #[instrument(skip(self, caller))]
    pub async fn grant_admin(&self, caller: &IdToken, email: &str) -> Result<String> {
        let email = non_blank(email)
            .ok_or_else(|| StorefrontError::Validation("Email is required.".to_owned()))?;
        let message = self.functions.add_admin_role(caller, &email).await?;
        tracing::info!(%email, "admin role granted");
        Ok(message)
    }

    /// Revoke the admin claim through the callable endpoint.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank email, or the endpoint's
    /// error.
    #[instrument(skip(self, caller))]
    pub async fn revoke_admin(&self, caller: &IdToken, email: &str) -> Result<String> {
        let email = non_blank(email)
            .ok_or_else(|| StorefrontError::Validation("Email is required.".to_owned()))?;
        let message = self.functions.remove_admin_role(caller, &email).await?;
        tracing::info!(%email, "admin role revoked");
        Ok(message)
    }

    /// Emails on the admin roster.
    ///
    /// # Errors
    ///
    /// Returns the endpoint's error.
    pub async fn list_admins(&self, caller: &IdToken) -> Result<Vec<String>> {
        Ok(self.functions.list_admins(caller).await?)
    }

    /// Every product, active or not, for the admin table.
    ///
    /// # Errors
    ///
    /// Returns the store's error.
    pub async fn products(&self) -> Result<Vec<Product>> {
        Ok(self.catalog.products().await?.as_ref().clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use faucet_store_core::{Email, SessionUser, UserId};

    use super::*;
    use crate::backend::memory::{
        MemoryAdminFunctions, MemoryAuth, MemoryBlobStore, MemoryDocumentStore,
    };
    use crate::backend::BackendErrorKind;
    use crate::catalog::seed::demo_products;

    fn form() -> ProductForm {
        ProductForm {
            name: "Brass Basin Mixer".to_owned(),
            price: "129.90".to_owned(),
            description: "Single lever".to_owned(),
            category: "bathroom".to_owned(),
            material: "Brass".to_owned(),
            features: "Ceramic cartridge\n\n Aerator ".to_owned(),
            stock: "4".to_owned(),
            active: true,
            ..ProductForm::default()
        }
    }

    fn session() -> Session {
        Session {
            user: SessionUser {
                id: UserId::new("u1"),
                email: Email::parse("admin@example.com").unwrap(),
                name: "Admin".to_owned(),
                avatar: None,
            },
            token: IdToken::new("tok-admin"),
        }
    }

    struct Fixture {
        store: Arc<MemoryDocumentStore>,
        blobs: Arc<MemoryBlobStore>,
        console: AdminConsole,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryDocumentStore::with_products(demo_products()));
        let blobs = Arc::new(MemoryBlobStore::default());
        let dyn_store: Arc<dyn DocumentStore> = store.clone();
        let catalog = CatalogCache::new(Arc::clone(&dyn_store), Duration::from_secs(300));
        let console = AdminConsole::new(
            dyn_store,
            blobs.clone(),
            Arc::new(MemoryAdminFunctions::new()),
            catalog,
        );
        Fixture {
            store,
            blobs,
            console,
        }
    }

    #[test]
    fn test_flag_defaults_to_non_admin() {
        assert!(!AdminFlag::default().is_admin());
        assert!(!AdminFlag::Resolved(false).is_admin());
        assert!(AdminFlag::Resolved(true).is_admin());
    }

    #[test]
    fn test_require_admin() {
        let session = session();
        assert!(matches!(
            require_admin(None, AdminFlag::Resolved(true)),
            Err(StorefrontError::SignInRequired)
        ));
        assert!(matches!(
            require_admin(Some(&session), AdminFlag::Unresolved),
            Err(StorefrontError::Forbidden(_))
        ));
        assert!(require_admin(Some(&session), AdminFlag::Resolved(true)).is_ok());
    }

    #[tokio::test]
    async fn test_resolve_flag_from_claim() {
        let user = session().user;
        let auth = MemoryAuth::new(user.clone(), "tok-admin", true);
        let flag = resolve_flag(&auth, &IdToken::new("tok-admin")).await;
        assert_eq!(flag, AdminFlag::Resolved(true));

        let auth = MemoryAuth::new(user, "tok-user", false);
        let flag = resolve_flag(&auth, &IdToken::new("tok-user")).await;
        assert_eq!(flag, AdminFlag::Resolved(false));
    }

    #[test]
    fn test_form_validation() {
        let draft = form().validate().unwrap();
        assert_eq!(draft.price, Price::from_minor(12_990));
        assert_eq!(draft.category, Category::Bathroom);
        assert_eq!(draft.stock, Some(4));
        let specs = draft.specs.unwrap();
        assert_eq!(specs.features, vec!["Ceramic cartridge", "Aerator"]);

        let bad = ProductForm {
            name: "  ".to_owned(),
            price: "-3".to_owned(),
            category: "garden".to_owned(),
            stock: "many".to_owned(),
            ..form()
        };
        let Err(StorefrontError::Validation(message)) = bad.validate() else {
            panic!("expected validation error");
        };
        assert!(message.contains("Name is required."));
        assert!(message.contains("Price"));
        assert!(message.contains("Category"));
        assert!(message.contains("Stock must be a whole number."));
    }

    #[test]
    fn test_form_rejects_price_above_max() {
        let bad = ProductForm {
            price: "79228162514264337593543950335".to_owned(),
            ..form()
        };
        let Err(StorefrontError::Validation(message)) = bad.validate() else {
            panic!("expected validation error");
        };
        assert!(message.contains("price cannot exceed 999999999.99"));
    }

    #[test]
    fn test_form_roundtrips_product() {
        let product = demo_products().remove(0);
        let draft = ProductForm::from_product(&product).validate().unwrap();
        assert_eq!(draft.name, product.name);
        assert_eq!(draft.price, product.price);
        assert_eq!(draft.specs, None);
    }

    #[tokio::test]
    async fn test_create_uploads_image_first() {
        let fx = fixture();
        let with_image = ProductForm {
            image: Some(ImageUpload {
                file_name: "mixer.jpg".to_owned(),
                content_type: "image/jpeg".to_owned(),
                bytes: vec![0xFF, 0xD8],
            }),
            ..form()
        };
        let id = fx.console.save_product(None, &with_image).await.unwrap();

        assert_eq!(fx.blobs.len().await, 1);
        let products = fx.console.products().await.unwrap();
        let created = products.iter().find(|p| p.id == id).unwrap();
        assert!(created.image.starts_with("memory://images/"));
        assert_eq!(products.len(), 13);
    }

    #[tokio::test]
    async fn test_toggle_and_delete_invalidate_catalog() {
        let fx = fixture();
        let k1 = ProductId::new("k1");
        assert!(!fx.console.toggle_product_status(&k1).await.unwrap());
        let products = fx.console.products().await.unwrap();
        assert!(!products.iter().find(|p| p.id == k1).unwrap().active);

        fx.console.delete_product(&k1).await.unwrap();
        assert_eq!(fx.console.products().await.unwrap().len(), 11);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let fx = fixture();
        fx.store.set_unavailable(true);
        let err = fx.console.save_product(None, &form()).await.unwrap_err();
        assert!(matches!(
            err,
            StorefrontError::Backend(ref e) if e.kind == BackendErrorKind::Unavailable
        ));
    }

    #[tokio::test]
    async fn test_blank_email_is_rejected_before_the_call() {
        let fx = fixture();
        let err = fx
            .console
            .grant_admin(&IdToken::new("tok-admin"), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, StorefrontError::Validation(_)));
    }
}
