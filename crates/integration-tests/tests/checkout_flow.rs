//! A shopper's path from the catalog to a paid order.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use faucet_store_core::{OrderStatus, PaymentStatus, ProductId, Profile};
use faucet_store_integration_tests::{
    InProcessFunctions, SHOPPER_TOKEN, TestStorefront, seeded_directory, session_user,
};
use faucet_store_storefront::backend::PaymentDetails;
use faucet_store_storefront::backend::memory::MemoryAuth;
use faucet_store_storefront::views::{Action, FormSubmission};

fn shop(path: &str) -> TestStorefront {
    let auth = MemoryAuth::new(
        session_user("u-shopper", "shopper@example.com", "Shopper"),
        SHOPPER_TOKEN,
        false,
    );
    TestStorefront::new(
        path,
        auth,
        Arc::new(InProcessFunctions::new(seeded_directory())),
    )
}

fn profile() -> Profile {
    Profile {
        name: Some("Ayşe Yılmaz".to_owned()),
        phone: Some("+90 555 000 0000".to_owned()),
        address: Some("Atatürk Cd. 12".to_owned()),
        city: Some("İzmir".to_owned()),
        postal_code: Some("35000".to_owned()),
        ..Profile::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_two_faucets_end_to_end() {
    let mut shop = shop("/");
    shop.app.start().await;

    // Browse and fill the cart before signing in.
    assert!(shop.app.handle_link_click("/products/kitchen").await);
    let k1 = ProductId::new("k1");
    shop.app.dispatch(Action::AddToCart(k1.clone())).await;
    shop.app.dispatch(Action::AddToCart(k1.clone())).await;
    assert_eq!(shop.app.host().cart_count, 2);

    // Checkout without a session is refused.
    shop.app.navigate("/cart").await;
    shop.app.dispatch(Action::BeginCheckout).await;
    assert_eq!(shop.last_toast().as_deref(), Some("Please sign in to checkout."));

    // With a session but no profile, the shopper lands on the profile form.
    shop.app.dispatch(Action::SignIn).await;
    shop.app.dispatch(Action::BeginCheckout).await;
    assert_eq!(shop.app.router().current().unwrap().0, "/profile");
    assert!(shop.store.orders().await.is_empty());

    shop.app.submit(FormSubmission::Profile(profile())).await;
    assert_eq!(shop.last_toast().as_deref(), Some("Profile saved!"));

    // Now the payment form appears and the order settles.
    shop.app.navigate("/cart").await;
    shop.app.dispatch(Action::BeginCheckout).await;
    assert!(shop.app.host().html().contains("payment-form"));

    let started = tokio::time::Instant::now();
    shop.app
        .submit(FormSubmission::Payment(PaymentDetails::new(
            "4111 1111 1111 1111",
            "12/29",
            "123",
            "AYSE YILMAZ",
        )))
        .await;
    assert!(started.elapsed() >= Duration::from_millis(1500));

    let orders = shop.store.orders().await;
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.total.to_string(), "399.98");
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 2);
    assert_eq!(order.status, OrderStatus::Confirmed);
    assert_eq!(order.payment_status, PaymentStatus::Paid);
    assert_eq!(order.shipping_address.city, "İzmir");

    assert!(shop.app.state().cart.is_empty());
    assert_eq!(shop.app.host().cart_count, 0);
    assert!(shop.app.host().html().contains(order.id.as_str()));

    // The order shows up in the history.
    shop.app.navigate("/orders").await;
    assert!(shop.app.host().html().contains(order.id.as_str()));
}

#[tokio::test]
async fn test_orders_require_sign_in() {
    let mut shop = shop("/orders");
    shop.app.start().await;

    assert_eq!(shop.last_toast().as_deref(), Some("Please sign in to continue."));
    assert!(!shop.app.host().html().contains("You have no orders yet."));
}
