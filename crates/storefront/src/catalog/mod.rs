//! Catalog cache.
//!
//! Holds the product list fetched from the document store. The list is
//! cached with `moka` for the configured TTL, refreshed on demand, and
//! invalidated whenever an admin mutates a product.

pub mod seed;

use std::sync::Arc;
use std::time::Duration;

use faucet_store_core::{Category, Product, ProductId};
use moka::future::Cache;
use tracing::instrument;

use crate::backend::{BackendError, DocumentStore};

const CATALOG_KEY: &str = "catalog";

/// Cached view of the product catalog.
#[derive(Clone)]
pub struct CatalogCache {
    store: Arc<dyn DocumentStore>,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl CatalogCache {
    /// Create a cache over `store` whose entries live for `ttl`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(ttl)
            .build();
        Self { store, cache }
    }

    /// The full catalog ordered by name, fetched if not cached.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the catalog has to be fetched and the
    /// fetch fails. Failures are not cached.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, BackendError> {
        let store = Arc::clone(&self.store);
        self.cache
            .try_get_with(CATALOG_KEY, async move {
                let products = store.list_products().await?;
                tracing::debug!(count = products.len(), "catalog fetched");
                Ok::<_, BackendError>(Arc::new(products))
            })
            .await
            .map_err(Arc::unwrap_or_clone)
    }

    /// Drop the cached list and fetch it again.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the fetch fails.
    pub async fn refresh(&self) -> Result<Arc<Vec<Product>>, BackendError> {
        self.invalidate().await;
        self.products().await
    }

    /// Forget the cached list; the next read fetches from the store.
    pub async fn invalidate(&self) {
        self.cache.invalidate(CATALOG_KEY).await;
    }

    /// Active products, optionally limited to one category.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the catalog cannot be fetched.
    pub async fn browse(&self, category: Option<Category>) -> Result<Vec<Product>, BackendError> {
        let products = self.products().await?;
        Ok(products
            .iter()
            .filter(|product| product.active)
            .filter(|product| category.is_none_or(|c| product.category == c))
            .cloned()
            .collect())
    }

    /// Look up one product by id, active or not.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the catalog cannot be fetched.
    pub async fn find(&self, id: &ProductId) -> Result<Option<Product>, BackendError> {
        let products = self.products().await?;
        Ok(products.iter().find(|product| &product.id == id).cloned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryDocumentStore;

    fn cache_over(store: &Arc<MemoryDocumentStore>) -> CatalogCache {
        let dyn_store: Arc<dyn DocumentStore> = store.clone();
        CatalogCache::new(dyn_store, Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_browse_filters_category_and_inactive() {
        let mut products = seed::demo_products();
        if let Some(first_kitchen) = products
            .iter_mut()
            .find(|p| p.category == Category::Kitchen)
        {
            first_kitchen.active = false;
        }
        let store = Arc::new(MemoryDocumentStore::with_products(products));
        let catalog = cache_over(&store);

        let kitchen = catalog.browse(Some(Category::Kitchen)).await.unwrap();
        assert_eq!(kitchen.len(), 2);
        assert!(kitchen.iter().all(|p| p.category == Category::Kitchen && p.active));

        let all = catalog.browse(None).await.unwrap();
        assert_eq!(all.len(), 11);
    }

    #[tokio::test]
    async fn test_cached_until_invalidated() {
        let store = Arc::new(MemoryDocumentStore::with_products(seed::demo_products()));
        let catalog = cache_over(&store);
        assert_eq!(catalog.products().await.unwrap().len(), 12);

        // A cached catalog survives an outage...
        store.set_unavailable(true);
        assert_eq!(catalog.products().await.unwrap().len(), 12);

        // ...but a refresh goes back to the store.
        assert!(catalog.refresh().await.is_err());
        store.set_unavailable(false);
        assert_eq!(catalog.products().await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_find() {
        let store = Arc::new(MemoryDocumentStore::with_products(seed::demo_products()));
        let catalog = cache_over(&store);
        let k1 = catalog.find(&ProductId::new("k1")).await.unwrap().unwrap();
        assert_eq!(k1.price.to_string(), "199.99");
        assert!(catalog.find(&ProductId::new("zz")).await.unwrap().is_none());
    }
}
