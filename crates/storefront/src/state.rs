//! Application state owned by the storefront controller.
//!
//! One value holds everything a session mutates: the signed-in session,
//! the resolved admin flag, the cart, view modes and pending toasts. The
//! controller passes it by reference to the router and renderers; nothing
//! lives in ambient scope.

use faucet_store_core::ProductId;

use crate::admin::AdminFlag;
use crate::backend::Session;
use crate::cart::Cart;
use crate::notify::Notifier;

/// Whether the profile page shows the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileMode {
    #[default]
    View,
    Edit,
}

/// Mutable state of one storefront session.
#[derive(Debug)]
pub struct AppState {
    pub session: Option<Session>,
    pub admin: AdminFlag,
    pub cart: Cart,
    pub profile_mode: ProfileMode,
    /// Product loaded into the admin form, if editing one.
    pub editing_product: Option<ProductId>,
    pub notifier: Notifier,
}

impl AppState {
    #[must_use]
    pub fn new(notifier: Notifier) -> Self {
        Self {
            session: None,
            admin: AdminFlag::Unresolved,
            cart: Cart::new(),
            profile_mode: ProfileMode::View,
            editing_product: None,
            notifier,
        }
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Forget the session and everything tied to it. The cart stays.
    pub fn sign_out(&mut self) {
        self.session = None;
        self.admin = AdminFlag::Unresolved;
        self.profile_mode = ProfileMode::View;
        self.editing_product = None;
    }
}
