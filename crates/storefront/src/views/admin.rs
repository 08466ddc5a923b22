//! Admin panel: product table, product form, admin roster.

use askama::Template;
use faucet_store_core::{Category, Product};

use super::{Action, FormKind, Fragment, Listener, data_selector, money};
use crate::admin::ProductForm;

/// One product table row.
#[derive(Debug, Clone)]
pub struct AdminRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub stock: String,
    pub active: bool,
}

/// A category option in the product form.
#[derive(Debug, Clone)]
pub struct CategoryOption {
    pub slug: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub rows: Vec<AdminRow>,
    pub admins: Vec<String>,
    pub form_title: String,
    pub form: ProductForm,
    pub categories: Vec<CategoryOption>,
}

/// The admin panel. `editing` prefills the product form.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn admin_panel(
    products: &[Product],
    admins: &[String],
    editing: Option<&Product>,
) -> Result<Fragment, askama::Error> {
    let form = editing.map(ProductForm::from_product).unwrap_or_default();
    let template = AdminTemplate {
        rows: products
            .iter()
            .map(|p| AdminRow {
                id: p.id.to_string(),
                name: p.name.clone(),
                category: p.category.label().to_owned(),
                price: money(p.price),
                stock: p.stock.map_or_else(|| "-".to_owned(), |s| s.to_string()),
                active: p.active,
            })
            .collect(),
        admins: admins.to_vec(),
        form_title: editing.map_or_else(
            || "New product".to_owned(),
            |p| format!("Edit {}", p.name),
        ),
        categories: Category::ALL
            .into_iter()
            .map(|c| CategoryOption {
                slug: c.slug().to_owned(),
                label: c.label().to_owned(),
                selected: form.category == c.slug(),
            })
            .collect(),
        form,
    };

    let mut listeners = vec![Listener::click("#new-product-btn", Action::EditProduct(None))];
    for product in products {
        let id = product.id.as_str();
        listeners.push(Listener::click(
            data_selector("edit-product", id),
            Action::EditProduct(Some(product.id.clone())),
        ));
        listeners.push(Listener::click(
            data_selector("toggle-product", id),
            Action::ToggleProductStatus(product.id.clone()),
        ));
        listeners.push(Listener::click(
            data_selector("delete-product", id),
            Action::DeleteProduct(product.id.clone()),
        ));
    }
    listeners.push(Listener::submit(
        "#product-form",
        FormKind::Product(editing.map(|p| p.id.clone())),
    ));
    listeners.push(Listener::submit("#grant-admin-form", FormKind::GrantAdmin));
    for email in admins {
        listeners.push(Listener::click(
            data_selector("revoke-admin", email),
            Action::RevokeAdmin(email.clone()),
        ));
    }

    Ok(Fragment::with_listeners(template.render()?, listeners))
}
