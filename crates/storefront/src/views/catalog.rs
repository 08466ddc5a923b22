//! Catalog views: home, product grid, product detail.

use askama::Template;
use faucet_store_core::{Category, Product};

use super::{Action, Fragment, Listener, data_selector, money};
use crate::router::routes::category_path;

/// A product as shown on a card.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub purchasable: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: money(product.price),
            image: product.image.clone(),
            purchasable: product.is_purchasable(),
        }
    }
}

fn card_listeners(products: &[Product]) -> Vec<Listener> {
    let mut listeners = Vec::with_capacity(products.len() * 2);
    for product in products {
        listeners.push(Listener::click(
            data_selector("show-product", product.id.as_str()),
            Action::ShowProduct(product.id.clone()),
        ));
        if product.is_purchasable() {
            listeners.push(Listener::click(
                data_selector("add-to-cart", product.id.as_str()),
                Action::AddToCart(product.id.clone()),
            ));
        }
    }
    listeners
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub preview: Vec<ProductCard>,
    pub categories: Vec<(String, String)>,
}

/// Hero plus a preview of featured products.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn home(preview: &[Product]) -> Result<Fragment, askama::Error> {
    let template = HomeTemplate {
        preview: preview.iter().map(ProductCard::from).collect(),
        categories: Category::ALL
            .into_iter()
            .map(|c| (c.label().to_owned(), category_path(c).to_owned()))
            .collect(),
    };
    Ok(Fragment::with_listeners(
        template.render()?,
        card_listeners(preview),
    ))
}

#[derive(Template)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub title: String,
    pub products: Vec<ProductCard>,
}

/// Product grid for the whole catalog or one category.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn products(category: Option<Category>, products: &[Product]) -> Result<Fragment, askama::Error> {
    let template = ProductsTemplate {
        title: category.map_or("All Products", |c| c.label()).to_owned(),
        products: products.iter().map(ProductCard::from).collect(),
    };
    Ok(Fragment::with_listeners(
        template.render()?,
        card_listeners(products),
    ))
}

#[derive(Template)]
#[template(path = "product_detail.html")]
pub struct ProductDetailTemplate {
    pub card: ProductCard,
    pub category_label: String,
    pub back_href: String,
    pub details: String,
    pub specs: Vec<(String, String)>,
    pub features: Vec<String>,
    pub stock_label: String,
}

fn stock_label(product: &Product) -> String {
    match product.stock {
        Some(0) => "Out of stock".to_owned(),
        Some(n) => format!("{n} in stock"),
        None => "In stock".to_owned(),
    }
}

/// Full product page.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn product_detail(product: &Product) -> Result<Fragment, askama::Error> {
    let mut specs = Vec::new();
    let mut features = Vec::new();
    if let Some(block) = &product.specs {
        for (label, value) in [
            ("Material", &block.material),
            ("Finish", &block.finish),
            ("Dimensions", &block.dimensions),
            ("Warranty", &block.warranty),
        ] {
            if let Some(value) = value {
                specs.push((label.to_owned(), value.clone()));
            }
        }
        features.clone_from(&block.features);
    }

    let template = ProductDetailTemplate {
        card: ProductCard::from(product),
        category_label: product.category.label().to_owned(),
        back_href: category_path(product.category).to_owned(),
        details: product.details.clone().unwrap_or_default(),
        specs,
        features,
        stock_label: stock_label(product),
    };

    let mut listeners = Vec::new();
    if product.is_purchasable() {
        listeners.push(Listener::click(
            data_selector("add-to-cart", product.id.as_str()),
            Action::AddToCart(product.id.clone()),
        ));
    }
    Ok(Fragment::with_listeners(template.render()?, listeners))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use faucet_store_core::ProductSpecs;

    use super::*;
    use crate::catalog::seed::demo_products;

    #[test]
    fn test_grid_binds_add_to_cart_per_card() {
        let catalog = demo_products();
        let kitchen: Vec<Product> = catalog
            .into_iter()
            .filter(|p| p.category == Category::Kitchen)
            .collect();
        let fragment = products(Some(Category::Kitchen), &kitchen).unwrap();

        assert!(fragment.html.contains("Kitchen Faucets"));
        assert!(fragment.html.contains("₺199.99"));
        assert_eq!(
            fragment.action_for("[data-add-to-cart=\"k1\"]"),
            Some(&Action::AddToCart("k1".into()))
        );
        assert_eq!(fragment.listeners.len(), 6);
    }

    #[test]
    fn test_empty_grid_message() {
        let fragment = products(Some(Category::Shower), &[]).unwrap();
        assert!(fragment.html.contains("No products found in this category."));
        assert!(fragment.listeners.is_empty());
    }

    #[test]
    fn test_markup_is_escaped() {
        let mut product = demo_products().remove(0);
        product.name = "<script>alert(1)</script>".to_owned();
        let fragment = products(None, &[product]).unwrap();
        assert!(!fragment.html.contains("<script>"));
    }

    #[test]
    fn test_detail_shows_specs_and_hides_cart_when_sold_out() {
        let mut product = demo_products().remove(0);
        product.stock = Some(0);
        product.specs = Some(ProductSpecs {
            material: Some("Brass".to_owned()),
            features: vec!["Pull-out spray".to_owned()],
            ..ProductSpecs::default()
        });
        let fragment = product_detail(&product).unwrap();

        assert!(fragment.html.contains("Brass"));
        assert!(fragment.html.contains("Pull-out spray"));
        assert!(fragment.html.contains("Out of stock"));
        assert!(fragment.listeners.is_empty());
    }
}
