//! Checkout orchestrator.
//!
//! Gates run in order: signed in, cart not empty, profile complete. Only
//! then is an order written (pending/pending), payment confirmed, the order
//! marked paid/confirmed, and the cart cleared. Each external call runs to
//! completion before the next starts. Nothing is retried or rolled back.

use std::sync::Arc;

use chrono::Utc;
use faucet_store_core::{
    NewOrder, OrderId, OrderItem, OrderStatus, OrderUpdate, PaymentMethod, PaymentStatus, Price,
    ProfileField, SessionUser, ShippingAddress,
};
use tracing::instrument;

use crate::backend::{BackendError, DocumentStore, PaymentDetails, PaymentGateway, PaymentOutcome};
use crate::cart::Cart;

/// A checkout that passed every gate.
#[derive(Debug, Clone)]
pub struct CheckoutReady {
    pub user: SessionUser,
    pub shipping: ShippingAddress,
}

/// Why checkout could not start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutBlocked {
    SignInRequired,
    EmptyCart,
    /// The profile lacks these required fields.
    ProfileIncomplete(Vec<ProfileField>),
    /// The profile could not be fetched.
    Store(BackendError),
}

/// How an order submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// A gate stopped the checkout; no order was written.
    Blocked(CheckoutBlocked),
    /// Payment fields were missing; no order was written.
    InvalidPayment(Vec<&'static str>),
    /// Paid and confirmed; the cart has been cleared.
    Confirmed { order_id: OrderId, total: Price },
    /// The gateway declined; the order stays pending/unpaid.
    Declined { order_id: OrderId, reason: String },
    /// An external call failed. `order_id` is set once the order exists.
    Failed {
        order_id: Option<OrderId>,
        error: BackendError,
    },
}

/// Sequences a cart into a persisted, paid order.
#[derive(Clone)]
pub struct CheckoutOrchestrator {
    store: Arc<dyn DocumentStore>,
    payments: Arc<dyn PaymentGateway>,
}

impl CheckoutOrchestrator {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, payments: Arc<dyn PaymentGateway>) -> Self {
        Self { store, payments }
    }

    /// Run the sign-in, cart and profile gates.
    ///
    /// # Errors
    ///
    /// Returns the first gate that failed.
    #[instrument(skip_all)]
    pub async fn prepare(
        &self,
        user: Option<&SessionUser>,
        cart: &Cart,
    ) -> Result<CheckoutReady, CheckoutBlocked> {
        let user = user.ok_or(CheckoutBlocked::SignInRequired)?;
        if cart.is_empty() {
            return Err(CheckoutBlocked::EmptyCart);
        }
        let profile = self
            .store
            .get_profile(&user.id)
            .await
            .map_err(CheckoutBlocked::Store)?
            .unwrap_or_default();
        let shipping =
            ShippingAddress::from_profile(&profile).map_err(CheckoutBlocked::ProfileIncomplete)?;
        Ok(CheckoutReady {
            user: user.clone(),
            shipping,
        })
    }

    /// Snapshot the cart into a pending order.
    #[must_use]
    pub fn build_order(ready: &CheckoutReady, cart: &Cart) -> NewOrder {
        let now = Utc::now();
        NewOrder {
            user_id: ready.user.id.clone(),
            user_email: ready.user.email.clone(),
            user_name: ready.shipping.name.clone(),
            items: cart
                .items()
                .iter()
                .map(|item| OrderItem {
                    product_id: item.product.id.clone(),
                    name: item.product.name.clone(),
                    price: item.product.price,
                    quantity: item.quantity,
                    image: item.product.image.clone(),
                })
                .collect(),
            total: cart.total(),
            status: OrderStatus::Pending,
            shipping_address: ready.shipping.clone(),
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::CreditCard,
            created_at: now,
            updated_at: now,
        }
    }

    /// Run every gate, then write, confirm and settle the order.
    ///
    /// The cart is cleared only when the order has been marked paid.
    #[instrument(skip_all)]
    pub async fn place_order(
        &self,
        user: Option<&SessionUser>,
        cart: &mut Cart,
        payment: &PaymentDetails,
    ) -> CheckoutOutcome {
        let ready = match self.prepare(user, cart).await {
            Ok(ready) => ready,
            Err(blocked) => {
                tracing::warn!(?blocked, "checkout blocked");
                return CheckoutOutcome::Blocked(blocked);
            }
        };

        let missing = payment.missing_fields();
        if !missing.is_empty() {
            return CheckoutOutcome::InvalidPayment(missing);
        }

        let order = Self::build_order(&ready, cart);
        let total = order.total;
        let order_id = match self.store.create_order(&order).await {
            Ok(id) => id,
            Err(error) => {
                tracing::error!(%error, "order write failed");
                return CheckoutOutcome::Failed {
                    order_id: None,
                    error,
                };
            }
        };
        tracing::info!(%order_id, %total, items = order.items.len(), "order created");

        match self.payments.confirm(&order_id, total, payment).await {
            Ok(PaymentOutcome::Approved) => {}
            Ok(PaymentOutcome::Declined(reason)) => {
                tracing::warn!(%order_id, %reason, "payment declined");
                return CheckoutOutcome::Declined { order_id, reason };
            }
            Err(error) => {
                tracing::error!(%order_id, %error, "payment confirmation failed");
                return CheckoutOutcome::Failed {
                    order_id: Some(order_id),
                    error,
                };
            }
        }

        if let Err(error) = self
            .store
            .update_order(&order_id, OrderUpdate::payment_confirmed())
            .await
        {
            tracing::error!(%order_id, %error, "order update after payment failed");
            return CheckoutOutcome::Failed {
                order_id: Some(order_id),
                error,
            };
        }

        cart.clear();
        tracing::info!(%order_id, "order confirmed");
        CheckoutOutcome::Confirmed { order_id, total }
    }
}
