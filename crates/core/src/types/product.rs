//! Catalog product records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Price, ProductId};

/// Optional technical specification block shown on the product detail view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductSpecs {
    pub material: Option<String>,
    pub finish: Option<String>,
    pub dimensions: Option<String>,
    pub warranty: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

/// A catalog product.
///
/// The cart keeps its own snapshot of a product, so later admin edits do
/// not change what is already in a shopper's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Public image URL.
    pub image: String,
    pub description: String,
    pub category: Category,
    pub details: Option<String>,
    pub specs: Option<ProductSpecs>,
    pub stock: Option<u32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can be put in a cart.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.active && self.stock != Some(0)
    }
}

/// Admin form input for creating or editing a product.
///
/// The image URL is filled in after the upload completes; `image` is left
/// `None` to keep the current image on edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub price: Price,
    pub image: Option<String>,
    pub description: String,
    pub category: Category,
    pub details: Option<String>,
    pub specs: Option<ProductSpecs>,
    pub stock: Option<u32>,
    pub active: bool,
}

impl ProductDraft {
    /// Build a full product record from this draft.
    #[must_use]
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            image: self.image.unwrap_or_default(),
            description: self.description,
            category: self.category,
            details: self.details,
            specs: self.specs,
            stock: self.stock,
            active: self.active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply this draft over an existing product, keeping identity and
    /// creation time (and the image when no new one was uploaded).
    #[must_use]
    pub fn apply_to(self, existing: &Product, now: DateTime<Utc>) -> Product {
        Product {
            id: existing.id.clone(),
            name: self.name,
            price: self.price,
            image: self.image.unwrap_or_else(|| existing.image.clone()),
            description: self.description,
            category: self.category,
            details: self.details,
            specs: self.specs,
            stock: self.stock,
            active: self.active,
            created_at: existing.created_at,
            updated_at: now,
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price,
            image: Some(product.image.clone()),
            description: product.description.clone(),
            category: product.category,
            details: product.details.clone(),
            specs: product.specs.clone(),
            stock: product.stock,
            active: product.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ProductDraft {
        ProductDraft {
            name: "Pull-out Kitchen Faucet".to_owned(),
            price: Price::from_minor(19_999),
            image: None,
            description: "Single lever".to_owned(),
            category: Category::Kitchen,
            details: None,
            specs: None,
            stock: Some(3),
            active: true,
        }
    }

    #[test]
    fn test_apply_keeps_identity_and_image() {
        let created = DateTime::<Utc>::UNIX_EPOCH;
        let existing = ProductDraft {
            image: Some("https://img/k1.jpg".to_owned()),
            ..draft()
        }
        .into_product(ProductId::new("k1"), created);

        let now = Utc::now();
        let edited = ProductDraft {
            name: "Renamed".to_owned(),
            ..draft()
        }
        .apply_to(&existing, now);

        assert_eq!(edited.id, existing.id);
        assert_eq!(edited.image, "https://img/k1.jpg");
        assert_eq!(edited.created_at, created);
        assert_eq!(edited.updated_at, now);
        assert_eq!(edited.name, "Renamed");
    }

    #[test]
    fn test_out_of_stock_is_not_purchasable() {
        let mut product = draft().into_product(ProductId::new("k1"), Utc::now());
        assert!(product.is_purchasable());
        product.stock = Some(0);
        assert!(!product.is_purchasable());
        product.stock = None;
        product.active = false;
        assert!(!product.is_purchasable());
    }
}
