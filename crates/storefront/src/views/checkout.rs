//! Cart, payment form and order confirmation views.

use askama::Template;
use faucet_store_core::{OrderId, Price, ShippingAddress};

use super::{Action, FormKind, Fragment, Listener, data_selector, money};
use crate::cart::Cart;

/// One cart row.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub image: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

fn lines(cart: &Cart) -> Vec<CartLine> {
    cart.items()
        .iter()
        .map(|item| CartLine {
            id: item.product.id.to_string(),
            name: item.product.name.clone(),
            image: item.product.image.clone(),
            unit_price: money(item.product.price),
            quantity: item.quantity,
            line_total: money(item.line_total()),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub lines: Vec<CartLine>,
    pub total: String,
}

/// Cart contents with quantity controls and the running total.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn cart(cart: &Cart) -> Result<Fragment, askama::Error> {
    let template = CartTemplate {
        lines: lines(cart),
        total: money(cart.total()),
    };

    let mut listeners = Vec::new();
    for item in cart.items() {
        let id = &item.product.id;
        let quantity = i64::from(item.quantity);
        for (attr, next) in [
            ("decrement", quantity - 1),
            ("increment", quantity + 1),
            ("remove", 0),
        ] {
            listeners.push(Listener::click(
                data_selector(attr, id.as_str()),
                Action::SetQuantity {
                    product: id.clone(),
                    quantity: next,
                },
            ));
        }
    }
    if !cart.is_empty() {
        listeners.push(Listener::click("#checkout-button", Action::BeginCheckout));
    }
    Ok(Fragment::with_listeners(template.render()?, listeners))
}

#[derive(Template)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub lines: Vec<CartLine>,
    pub total: String,
    pub ship_name: String,
    pub ship_address: String,
    pub ship_city: String,
    pub ship_phone: String,
}

/// Payment form with the order summary and shipping address.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn payment_form(cart: &Cart, shipping: &ShippingAddress) -> Result<Fragment, askama::Error> {
    let template = CheckoutTemplate {
        lines: lines(cart),
        total: money(cart.total()),
        ship_name: shipping.name.clone(),
        ship_address: shipping.address.clone(),
        ship_city: shipping.city.clone(),
        ship_phone: shipping.phone.clone(),
    };
    Ok(Fragment::with_listeners(
        template.render()?,
        vec![Listener::submit("#payment-form", FormKind::Payment)],
    ))
}

#[derive(Template)]
#[template(path = "order_confirmation.html")]
pub struct ConfirmationTemplate {
    pub order_id: String,
    pub total: String,
}

/// Shown after the payment has been confirmed.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn order_confirmation(order_id: &OrderId, total: Price) -> Result<Fragment, askama::Error> {
    let template = ConfirmationTemplate {
        order_id: order_id.to_string(),
        total: money(total),
    };
    Ok(Fragment::markup(template.render()?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::tests::product;

    #[test]
    fn test_empty_cart() {
        let fragment = cart(&Cart::new()).unwrap();
        assert!(fragment.html.contains("Your cart is empty."));
        assert!(fragment.action_for("#checkout-button").is_none());
    }

    #[test]
    fn test_quantity_buttons_carry_next_quantity() {
        let mut basket = Cart::new();
        let k1 = product("k1", 19_999);
        basket.add_item(&k1);
        basket.add_item(&k1);
        let fragment = cart(&basket).unwrap();

        assert!(fragment.html.contains("₺399.98"));
        assert_eq!(
            fragment.action_for("[data-decrement=\"k1\"]"),
            Some(&Action::SetQuantity {
                product: k1.id.clone(),
                quantity: 1
            })
        );
        assert_eq!(
            fragment.action_for("[data-increment=\"k1\"]"),
            Some(&Action::SetQuantity {
                product: k1.id.clone(),
                quantity: 3
            })
        );
        assert_eq!(
            fragment.action_for("#checkout-button"),
            Some(&Action::BeginCheckout)
        );
    }

    #[test]
    fn test_payment_form_binds_submit() {
        let mut basket = Cart::new();
        basket.add_item(&product("a1", 4_999));
        let shipping = ShippingAddress {
            name: "Ayşe".to_owned(),
            phone: "555".to_owned(),
            address: "Atatürk Cd. 12".to_owned(),
            city: "İzmir".to_owned(),
            postal_code: None,
            additional_info: None,
        };
        let fragment = payment_form(&basket, &shipping).unwrap();
        assert!(fragment.binds_form(&FormKind::Payment));
        assert!(fragment.html.contains("İzmir"));
        assert!(fragment.html.contains("₺49.99"));
    }
}
