//! Storefront controller.
//!
//! [`Storefront`] owns the router, the page host and the session state, and
//! is the only entry point for host events: link clicks, back/forward,
//! listener actions and form submissions. Every caught failure becomes one
//! toast through [`StorefrontError::report`]; nothing propagates past it.

use std::sync::Arc;

use faucet_store_core::{Product, ProductId, Profile, UserId};
use tracing::instrument;

use crate::admin::{AdminConsole, ProductForm, require_admin, resolve_flag};
use crate::backend::{BackendError, Backends, IdToken, PaymentDetails};
use crate::catalog::CatalogCache;
use crate::catalog::seed::PREVIEW_IDS;
use crate::checkout::{CheckoutBlocked, CheckoutOrchestrator, CheckoutOutcome};
use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError, clear_sentry_user, set_sentry_user};
use crate::host::BrowserHost;
use crate::notify::{Notifier, ToastLevel};
use crate::router::{NavigationKind, Route, RouteRenderer, Router, Transition};
use crate::state::{AppState, ProfileMode};
use crate::views::{self, Action, FormSubmission, Fragment};

const UNAVAILABLE_HTML: &str =
    "<section class=\"error-page\"><p>This page is unavailable right now.</p></section>";

/// Session state plus the services that render and mutate it.
///
/// Kept apart from the router and host so a navigation can borrow all
/// three at once.
pub(crate) struct Shop {
    state: AppState,
    backends: Backends,
    catalog: CatalogCache,
    checkout: CheckoutOrchestrator,
    console: AdminConsole,
}

impl Shop {
    fn notify<H: BrowserHost>(&mut self, host: &mut H, level: ToastLevel, message: impl Into<String>) {
        let toast = self.state.notifier.emit(level, message);
        host.show_toast(&toast);
    }

    fn fail<H: BrowserHost>(&mut self, host: &mut H, error: &StorefrontError, context: &str) {
        let message = error.report(context);
        self.notify(host, ToastLevel::Error, message);
    }

    fn user_id(&self) -> Option<&UserId> {
        self.state.session.as_ref().map(|session| &session.user.id)
    }

    async fn home(&self) -> Result<Fragment> {
        let products = self.catalog.products().await?;
        let preview: Vec<Product> = PREVIEW_IDS
            .iter()
            .filter_map(|id| {
                products
                    .iter()
                    .find(|product| product.id.as_str() == *id && product.active)
            })
            .cloned()
            .collect();
        Ok(views::catalog::home(&preview)?)
    }

    async fn page(&self, route: Route) -> Result<Fragment> {
        match route {
            Route::Home => self.home().await,
            Route::Products(category) => {
                let products = self.catalog.browse(category).await?;
                Ok(views::catalog::products(category, &products)?)
            }
            Route::Cart => Ok(views::checkout::cart(&self.state.cart)?),
            Route::Profile => {
                let Some(session) = &self.state.session else {
                    return Ok(views::account::signed_out(
                        "Please sign in to view your profile.",
                    )?);
                };
                let profile = self
                    .backends
                    .store
                    .get_profile(&session.user.id)
                    .await?
                    .unwrap_or_default();
                let editing = self.state.profile_mode == ProfileMode::Edit;
                Ok(views::account::profile(&session.user, &profile, editing)?)
            }
            Route::Orders => {
                let user = self.user_id().ok_or(StorefrontError::SignInRequired)?;
                let orders = self.backends.store.list_orders(user).await?;
                Ok(views::account::orders(&orders)?)
            }
            Route::Admin => {
                let session = require_admin(self.state.session.as_ref(), self.state.admin)?;
                let products = self.console.products().await?;
                let admins = self.console.list_admins(&session.token).await?;
                let editing = self
                    .state
                    .editing_product
                    .as_ref()
                    .and_then(|id| products.iter().find(|product| &product.id == id));
                Ok(views::admin::admin_panel(&products, &admins, editing)?)
            }
        }
    }
}

impl<H: BrowserHost> RouteRenderer<H> for Shop {
    async fn render(&mut self, route: Route, host: &mut H) -> Fragment {
        let error = match self.page(route).await {
            Ok(fragment) => return fragment,
            Err(error) => error,
        };
        self.fail(host, &error, "render");
        if route == Route::Home {
            return Fragment::markup(UNAVAILABLE_HTML);
        }
        match self.home().await {
            Ok(fragment) => fragment,
            Err(error) => {
                error.report("render home fallback");
                Fragment::markup(UNAVAILABLE_HTML)
            }
        }
    }
}

/// The storefront application: routing, cart, checkout and admin over one
/// [`BrowserHost`].
pub struct Storefront<H: BrowserHost> {
    config: StorefrontConfig,
    router: Router,
    host: H,
    shop: Shop,
}

impl<H: BrowserHost> Storefront<H> {
    /// Wire the controller to its collaborators and page host.
    #[must_use]
    pub fn new(config: StorefrontConfig, backends: Backends, host: H) -> Self {
        let catalog = CatalogCache::new(Arc::clone(&backends.store), config.catalog_ttl);
        let checkout =
            CheckoutOrchestrator::new(Arc::clone(&backends.store), Arc::clone(&backends.payments));
        let console = AdminConsole::new(
            Arc::clone(&backends.store),
            Arc::clone(&backends.blobs),
            Arc::clone(&backends.functions),
            catalog.clone(),
        );
        let router = Router::new(
            config.base_url.clone(),
            Transition::new(config.transition_settle),
        );
        let state = AppState::new(Notifier::new(config.toast_ttl));
        Self {
            config,
            router,
            host,
            shop: Shop {
                state,
                backends,
                catalog,
                checkout,
                console,
            },
        }
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub const fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.shop.state
    }

    pub const fn state_mut(&mut self) -> &mut AppState {
        &mut self.shop.state
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogCache {
        &self.shop.catalog
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Render whatever path the page loaded at.
    pub async fn start(&mut self) {
        let path = self.host.current_path();
        self.sync_cart_count();
        self.go(&path, NavigationKind::Initial).await;
    }

    /// Navigate to `path`, pushing a history entry.
    pub async fn navigate(&mut self, path: &str) {
        self.go(path, NavigationKind::Push).await;
    }

    /// The address bar moved through back/forward.
    pub async fn handle_pop_state(&mut self) {
        let path = self.host.current_path();
        self.go(&path, NavigationKind::Pop).await;
    }

    /// Route a clicked link. Returns `false` when the browser should follow
    /// it instead.
    pub async fn handle_link_click(&mut self, href: &str) -> bool {
        let Some(path) = self.router.intercept(href) else {
            return false;
        };
        self.navigate(&path).await;
        true
    }

    async fn go(&mut self, path: &str, kind: NavigationKind) {
        if let Err(e) = self
            .router
            .navigate(&mut self.host, &mut self.shop, path, kind)
            .await
        {
            self.fail(&StorefrontError::from(e), "navigate");
        }
    }

    async fn refresh(&mut self) {
        self.router.refresh(&mut self.host, &mut self.shop).await;
    }

    fn current_route(&self) -> Option<Route> {
        self.router.current().map(|(_, route)| route)
    }

    // =========================================================================
    // Listener dispatch
    // =========================================================================

    /// Execute the action bound to a clicked element.
    pub async fn dispatch(&mut self, action: Action) {
        tracing::debug!(?action, "dispatch");
        match action {
            Action::Navigate(path) => self.navigate(&path).await,
            Action::AddToCart(id) => self.add_to_cart(&id).await,
            Action::ShowProduct(id) => self.show_product(&id).await,
            Action::SetQuantity { product, quantity } => {
                self.set_quantity(&product, quantity).await;
            }
            Action::BeginCheckout => self.begin_checkout().await,
            Action::EditProfile => self.edit_profile().await,
            Action::SignIn => self.sign_in().await,
            Action::SignOut => self.sign_out().await,
            Action::EditProduct(id) => self.edit_product(id).await,
            Action::DeleteProduct(id) => self.delete_product(&id).await,
            Action::ToggleProductStatus(id) => self.toggle_product_status(&id).await,
            Action::RevokeAdmin(email) => self.revoke_admin(&email).await,
        }
    }

    /// Handle a submitted form.
    pub async fn submit(&mut self, submission: FormSubmission) {
        match submission {
            FormSubmission::Profile(profile) => self.save_profile(profile).await,
            FormSubmission::Payment(details) => self.place_order(&details).await,
            FormSubmission::Product { id, form } => self.save_product(id.as_ref(), &form).await,
            FormSubmission::GrantAdmin(email) => self.grant_admin(&email).await,
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Run the sign-in flow and resolve the admin flag.
    #[instrument(skip(self))]
    pub async fn sign_in(&mut self) {
        let auth = Arc::clone(&self.shop.backends.auth);
        let session = match auth.sign_in().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "sign-in failed");
                self.notify(ToastLevel::Error, format!("Sign-in failed: {}", e.message));
                return;
            }
        };
        set_sentry_user(&session.user.id, Some(session.user.email.as_str()));
        let flag = resolve_flag(auth.as_ref(), &session.token).await;
        tracing::info!(user_id = %session.user.id, admin = flag.is_admin(), "signed in");

        let greeting = format!("Welcome, {}!", session.user.name);
        self.shop.state.session = Some(session);
        self.shop.state.admin = flag;
        self.notify(ToastLevel::Success, greeting);
        self.refresh().await;
    }

    /// End the session. The cart is kept.
    #[instrument(skip(self))]
    pub async fn sign_out(&mut self) {
        let auth = Arc::clone(&self.shop.backends.auth);
        if let Err(e) = auth.sign_out().await {
            self.fail(&e.into(), "sign out");
            return;
        }
        self.shop.state.sign_out();
        clear_sentry_user();
        tracing::info!("signed out");
        self.notify(ToastLevel::Info, "You have been signed out.");

        if matches!(self.current_route(), Some(Route::Orders | Route::Admin)) {
            self.navigate("/").await;
        } else {
            self.refresh().await;
        }
    }

    // =========================================================================
    // Catalog and cart
    // =========================================================================

    /// Put one unit of a catalog product in the cart.
    pub async fn add_to_cart(&mut self, id: &ProductId) {
        let product = match self.shop.catalog.find(id).await {
            Ok(Some(product)) => product,
            Ok(None) => {
                self.notify(ToastLevel::Error, "Product not found.");
                return;
            }
            Err(e) => {
                self.fail(&e.into(), "add to cart");
                return;
            }
        };
        if !product.is_purchasable() {
            self.notify(ToastLevel::Error, format!("{} is out of stock.", product.name));
            return;
        }

        let quantity = self.shop.state.cart.add_item(&product);
        tracing::debug!(product_id = %id, quantity, "added to cart");
        self.sync_cart_count();
        self.notify(ToastLevel::Success, "Product added to cart!");
    }

    /// Set a cart line's quantity; zero or less removes it.
    pub async fn set_quantity(&mut self, id: &ProductId, quantity: i64) {
        self.shop.state.cart.set_quantity(id, quantity);
        self.sync_cart_count();
        if self.current_route() == Some(Route::Cart) {
            self.refresh().await;
        }
    }

    /// Show a product's detail view in place, without a history entry.
    pub async fn show_product(&mut self, id: &ProductId) {
        let fragment = match self.shop.catalog.find(id).await {
            Ok(Some(product)) => views::catalog::product_detail(&product).map_err(Into::into),
            Ok(None) => Err(BackendError::not_found("Product not found.").into()),
            Err(e) => Err(e.into()),
        };
        match fragment {
            Ok(fragment) => {
                self.host.mount(&fragment);
                self.host.scroll_to_top();
            }
            Err(e) => self.fail(&e, "show product"),
        }
    }

    fn sync_cart_count(&mut self) {
        self.host.set_cart_count(self.shop.state.cart.item_count());
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Run the checkout gates and show the payment form.
    ///
    /// An incomplete profile sends the shopper to the profile form instead.
    #[instrument(skip(self))]
    pub async fn begin_checkout(&mut self) {
        let user = self.shop.state.session.as_ref().map(|s| s.user.clone());
        let prepared = self
            .shop
            .checkout
            .prepare(user.as_ref(), &self.shop.state.cart)
            .await;
        match prepared {
            Ok(ready) => match views::checkout::payment_form(&self.shop.state.cart, &ready.shipping)
            {
                Ok(fragment) => {
                    self.host.mount(&fragment);
                    self.host.scroll_to_top();
                }
                Err(e) => self.fail(&e.into(), "payment form"),
            },
            Err(blocked) => self.checkout_blocked(blocked).await,
        }
    }

    async fn checkout_blocked(&mut self, blocked: CheckoutBlocked) {
        match blocked {
            CheckoutBlocked::SignInRequired => {
                tracing::warn!("checkout without a session");
                self.notify(ToastLevel::Error, "Please sign in to checkout.");
            }
            CheckoutBlocked::EmptyCart => {
                self.notify(ToastLevel::Error, "Your cart is empty.");
            }
            CheckoutBlocked::ProfileIncomplete(missing) => {
                let error = StorefrontError::ProfileIncomplete(missing);
                self.fail(&error, "checkout");
                self.shop.state.profile_mode = ProfileMode::Edit;
                self.navigate("/profile").await;
            }
            CheckoutBlocked::Store(e) => self.fail(&e.into(), "checkout"),
        }
    }

    /// Submit the payment form and settle the order.
    pub async fn place_order(&mut self, details: &PaymentDetails) {
        let user = self.shop.state.session.as_ref().map(|s| s.user.clone());
        let outcome = self
            .shop
            .checkout
            .place_order(user.as_ref(), &mut self.shop.state.cart, details)
            .await;
        self.sync_cart_count();

        match outcome {
            CheckoutOutcome::Confirmed { order_id, total } => {
                match views::checkout::order_confirmation(&order_id, total) {
                    Ok(fragment) => {
                        self.host.mount(&fragment);
                        self.host.scroll_to_top();
                    }
                    Err(e) => self.fail(&e.into(), "order confirmation"),
                }
                self.notify(
                    ToastLevel::Success,
                    "Payment successful! Thank you for your order.",
                );
            }
            CheckoutOutcome::Blocked(blocked) => self.checkout_blocked(blocked).await,
            CheckoutOutcome::InvalidPayment(fields) => {
                self.notify(
                    ToastLevel::Error,
                    format!("Please fill in: {}.", fields.join(", ")),
                );
            }
            CheckoutOutcome::Declined { reason, .. } => {
                self.notify(ToastLevel::Error, format!("Payment failed: {reason}."));
            }
            CheckoutOutcome::Failed { error, .. } => self.fail(&error.into(), "place order"),
        }
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Switch the profile page to its form.
    pub async fn edit_profile(&mut self) {
        self.shop.state.profile_mode = ProfileMode::Edit;
        if self.current_route() == Some(Route::Profile) {
            self.refresh().await;
        } else {
            self.navigate("/profile").await;
        }
    }

    /// Validate and store the profile form.
    ///
    /// Missing required fields block the write.
    #[instrument(skip(self, profile))]
    pub async fn save_profile(&mut self, profile: Profile) {
        let Some(user_id) = self.shop.user_id().cloned() else {
            self.fail(&StorefrontError::SignInRequired, "save profile");
            return;
        };
        let missing = profile.missing_required();
        if !missing.is_empty() {
            self.fail(&StorefrontError::ProfileIncomplete(missing), "save profile");
            return;
        }

        let store = Arc::clone(&self.shop.backends.store);
        if let Err(e) = store.set_profile(&user_id, &profile).await {
            self.fail(&e.into(), "save profile");
            return;
        }
        if let (Some(session), Some(name)) = (self.shop.state.session.as_mut(), profile.name) {
            session.user.name = name.trim().to_owned();
        }
        tracing::info!(user_id = %user_id, "profile saved");
        self.shop.state.profile_mode = ProfileMode::View;
        self.notify(ToastLevel::Success, "Profile saved!");
        self.refresh().await;
    }

    // =========================================================================
    // Admin
    // =========================================================================

    /// Caller token of a gated admin session, or a toast.
    fn admin_token(&mut self, context: &str) -> Option<IdToken> {
        match require_admin(self.shop.state.session.as_ref(), self.shop.state.admin) {
            Ok(session) => Some(session.token.clone()),
            Err(e) => {
                self.fail(&e, context);
                None
            }
        }
    }

    /// Load a product into the admin form, or clear it for a new one.
    pub async fn edit_product(&mut self, id: Option<ProductId>) {
        if self.admin_token("edit product").is_none() {
            return;
        }
        self.shop.state.editing_product = id;
        self.refresh().await;
    }

    /// Create or update a product from the admin form.
    pub async fn save_product(&mut self, id: Option<&ProductId>, form: &ProductForm) {
        if self.admin_token("save product").is_none() {
            return;
        }
        match self.shop.console.save_product(id, form).await {
            Ok(_) => {
                self.shop.state.editing_product = None;
                self.notify(ToastLevel::Success, "Product saved.");
                self.refresh().await;
            }
            Err(e) => self.fail(&e, "save product"),
        }
    }

    pub async fn delete_product(&mut self, id: &ProductId) {
        if self.admin_token("delete product").is_none() {
            return;
        }
        match self.shop.console.delete_product(id).await {
            Ok(()) => {
                if self.shop.state.editing_product.as_ref() == Some(id) {
                    self.shop.state.editing_product = None;
                }
                self.notify(ToastLevel::Success, "Product deleted.");
                self.refresh().await;
            }
            Err(e) => self.fail(&e, "delete product"),
        }
    }

    pub async fn toggle_product_status(&mut self, id: &ProductId) {
        if self.admin_token("toggle product").is_none() {
            return;
        }
        match self.shop.console.toggle_product_status(id).await {
            Ok(active) => {
                let message = if active {
                    "Product activated."
                } else {
                    "Product deactivated."
                };
                self.notify(ToastLevel::Success, message);
                self.refresh().await;
            }
            Err(e) => self.fail(&e, "toggle product"),
        }
    }

    pub async fn grant_admin(&mut self, email: &str) {
        let Some(token) = self.admin_token("grant admin") else {
            return;
        };
        match self.shop.console.grant_admin(&token, email).await {
            Ok(message) => {
                self.notify(ToastLevel::Success, message);
                self.refresh().await;
            }
            Err(e) => self.fail(&e, "grant admin"),
        }
    }

    pub async fn revoke_admin(&mut self, email: &str) {
        let Some(token) = self.admin_token("revoke admin") else {
            return;
        };
        match self.shop.console.revoke_admin(&token, email).await {
            Ok(message) => {
                self.notify(ToastLevel::Success, message);
                self.refresh().await;
            }
            Err(e) => self.fail(&e, "revoke admin"),
        }
    }

    /// Emails on the admin roster, or an empty list after a toast.
    pub async fn list_admins(&mut self) -> Vec<String> {
        let Some(token) = self.admin_token("list admins") else {
            return Vec::new();
        };
        match self.shop.console.list_admins(&token).await {
            Ok(admins) => admins,
            Err(e) => {
                self.fail(&e, "list admins");
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Toasts
    // =========================================================================

    fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.shop.notify(&mut self.host, level, message);
    }

    fn fail(&mut self, error: &StorefrontError, context: &str) {
        self.shop.fail(&mut self.host, error, context);
    }
}
