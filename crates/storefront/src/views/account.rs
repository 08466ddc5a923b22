//! Profile and order history views.

use askama::Template;
use faucet_store_core::{Order, Profile, ProfileField, SessionUser};

use super::{Action, FormKind, Fragment, Listener, money};

#[derive(Template)]
#[template(path = "signed_out.html")]
pub struct SignedOutTemplate {
    pub message: String,
}

/// Placeholder for views that need a session.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn signed_out(message: &str) -> Result<Fragment, askama::Error> {
    let template = SignedOutTemplate {
        message: message.to_owned(),
    };
    Ok(Fragment::with_listeners(
        template.render()?,
        vec![Listener::click("#signed-out-sign-in", Action::SignIn)],
    ))
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub editing: bool,
    pub display_name: String,
    pub email: String,
    pub avatar: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub additional_info: String,
    pub missing: Vec<String>,
}

/// Profile in view or edit mode.
///
/// The display name prefers the stored profile name and falls back to the
/// account name.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn profile(
    user: &SessionUser,
    profile: &Profile,
    editing: bool,
) -> Result<Fragment, askama::Error> {
    let value = |field: Option<&String>| field.cloned().unwrap_or_default();
    let display_name = profile
        .field(ProfileField::Name)
        .unwrap_or(user.name.as_str())
        .to_owned();
    let template = ProfileTemplate {
        editing,
        email: user.email.to_string(),
        avatar: user.avatar.clone().unwrap_or_default(),
        name: profile.name.clone().unwrap_or_else(|| user.name.clone()),
        phone: value(profile.phone.as_ref()),
        address: value(profile.address.as_ref()),
        city: value(profile.city.as_ref()),
        postal_code: value(profile.postal_code.as_ref()),
        additional_info: value(profile.additional_info.as_ref()),
        missing: profile
            .missing_required()
            .iter()
            .map(|f| f.label().to_owned())
            .collect(),
        display_name,
    };
    let listener = if editing {
        Listener::submit("#profile-form", FormKind::Profile)
    } else {
        Listener::click("#edit-profile-btn", Action::EditProfile)
    };
    Ok(Fragment::with_listeners(template.render()?, vec![listener]))
}

/// One row of the order history.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: String,
    pub placed: String,
    pub status: String,
    pub payment: String,
    pub total: String,
    pub items: Vec<String>,
}

impl From<&Order> for OrderRow {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            placed: order.created_at.format("%Y-%m-%d %H:%M").to_string(),
            status: order.status.label().to_owned(),
            payment: order.payment_status.to_string(),
            total: money(order.total),
            items: order
                .items
                .iter()
                .map(|item| format!("{} x {}", item.name, item.quantity))
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderRow>,
}

/// Order history, newest first as returned by the store.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn orders(orders: &[Order]) -> Result<Fragment, askama::Error> {
    let template = OrdersTemplate {
        orders: orders.iter().map(OrderRow::from).collect(),
    };
    Ok(Fragment::markup(template.render()?))
}
