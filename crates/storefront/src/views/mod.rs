//! View renderer.
//!
//! Each view is an askama template over a small precomputed view model.
//! Renderers return a [`Fragment`]: the markup plus the listeners the host
//! must bind. Listeners name an [`Action`] or a [`FormKind`] instead of a
//! global function, so nothing needs to be reachable from page scope.
//!
//! # Modules
//!
//! - [`catalog`] - home, product grid, product detail
//! - [`checkout`] - cart, payment form, order confirmation
//! - [`account`] - profile and order history
//! - [`admin`] - admin panel

pub mod account;
pub mod admin;
pub mod catalog;
pub mod checkout;

use faucet_store_core::{CurrencyCode, Price, ProductId, Profile};

use crate::admin::ProductForm;
use crate::backend::PaymentDetails;

/// Prices are shown in Turkish lira.
pub(crate) fn money(price: Price) -> String {
    price.display(CurrencyCode::TRY)
}

/// A shopper or admin intent carried by a click listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String),
    AddToCart(ProductId),
    ShowProduct(ProductId),
    SetQuantity { product: ProductId, quantity: i64 },
    BeginCheckout,
    EditProfile,
    SignIn,
    SignOut,
    /// Open the admin product form, empty or for an existing product.
    EditProduct(Option<ProductId>),
    DeleteProduct(ProductId),
    ToggleProductStatus(ProductId),
    RevokeAdmin(String),
}

/// Which form a submit listener belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Profile,
    Payment,
    /// Admin product form; `None` creates a new product.
    Product(Option<ProductId>),
    GrantAdmin,
}

/// Field values the host collected from a submitted form.
#[derive(Debug, Clone)]
pub enum FormSubmission {
    Profile(Profile),
    Payment(PaymentDetails),
    Product {
        id: Option<ProductId>,
        form: ProductForm,
    },
    GrantAdmin(String),
}

impl FormSubmission {
    /// The form this submission answers.
    #[must_use]
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Profile(_) => FormKind::Profile,
            Self::Payment(_) => FormKind::Payment,
            Self::Product { id, .. } => FormKind::Product(id.clone()),
            Self::GrantAdmin(_) => FormKind::GrantAdmin,
        }
    }
}

/// What a listener does when its event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Click(Action),
    Submit(FormKind),
}

/// One event registration for a rendered fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listener {
    /// CSS selector of the element to bind.
    pub selector: String,
    pub binding: Binding,
}

impl Listener {
    #[must_use]
    pub fn click(selector: impl Into<String>, action: Action) -> Self {
        Self {
            selector: selector.into(),
            binding: Binding::Click(action),
        }
    }

    #[must_use]
    pub fn submit(selector: impl Into<String>, form: FormKind) -> Self {
        Self {
            selector: selector.into(),
            binding: Binding::Submit(form),
        }
    }
}

/// Rendered markup and its listeners.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub html: String,
    pub listeners: Vec<Listener>,
}

impl Fragment {
    /// A fragment with no listeners.
    #[must_use]
    pub fn markup(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            listeners: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_listeners(html: String, listeners: Vec<Listener>) -> Self {
        Self { html, listeners }
    }

    /// The click action bound to `selector`, if any.
    #[must_use]
    pub fn action_for(&self, selector: &str) -> Option<&Action> {
        self.listeners.iter().find_map(|listener| match &listener.binding {
            Binding::Click(action) if listener.selector == selector => Some(action),
            _ => None,
        })
    }

    /// Whether a submit listener for `form` is bound.
    #[must_use]
    pub fn binds_form(&self, form: &FormKind) -> bool {
        self.listeners
            .iter()
            .any(|listener| listener.binding == Binding::Submit(form.clone()))
    }
}

/// Selector for an element tagged with `data-{attr}="{value}"`.
pub(crate) fn data_selector(attr: &str, value: &str) -> String {
    format!("[data-{attr}=\"{value}\"]")
}
