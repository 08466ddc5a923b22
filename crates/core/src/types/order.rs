//! Order records.
//!
//! A [`NewOrder`] is what checkout submits; the document store assigns the
//! id and hands back an [`Order`] on reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Email, OrderId, OrderStatus, PaymentMethod, PaymentStatus, Price, ProductId, Profile,
    ProfileField, UserId,
};

/// One purchased line, snapshotted from the cart at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub image: String,
}

impl OrderItem {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.line_total(self.quantity)
    }
}

/// Shipping address copied from the profile when the order is placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
    pub additional_info: Option<String>,
}

impl ShippingAddress {
    /// Snapshot a complete profile.
    ///
    /// # Errors
    ///
    /// Returns the missing required fields if the profile is incomplete.
    pub fn from_profile(profile: &Profile) -> Result<Self, Vec<ProfileField>> {
        let missing = profile.missing_required();
        match (
            profile.field(ProfileField::Name),
            profile.field(ProfileField::Phone),
            profile.field(ProfileField::Address),
            profile.field(ProfileField::City),
        ) {
            (Some(name), Some(phone), Some(address), Some(city)) => Ok(Self {
                name: name.to_owned(),
                phone: phone.to_owned(),
                address: address.to_owned(),
                city: city.to_owned(),
                postal_code: profile.postal_code.clone(),
                additional_info: profile.additional_info.clone(),
            }),
            _ => Err(missing),
        }
    }
}

/// An order ready to be written to the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub user_email: Email,
    pub user_name: String,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewOrder {
    /// Attach the id the store generated.
    #[must_use]
    pub fn with_id(self, id: OrderId) -> Order {
        Order {
            id,
            user_id: self.user_id,
            user_email: self.user_email,
            user_name: self.user_name,
            items: self.items,
            total: self.total,
            status: self.status,
            shipping_address: self.shipping_address,
            payment_status: self.payment_status,
            payment_method: self.payment_method,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub user_email: Email,
    pub user_name: String,
    pub items: Vec<OrderItem>,
    pub total: Price,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied to an existing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl OrderUpdate {
    /// The update recorded after a successful payment confirmation.
    #[must_use]
    pub const fn payment_confirmed() -> Self {
        Self {
            status: Some(OrderStatus::Confirmed),
            payment_status: Some(PaymentStatus::Paid),
        }
    }
}

impl Order {
    /// Apply a partial update, refusing undefined status transitions.
    ///
    /// # Errors
    ///
    /// Returns the rejected `(from, to)` pair when the status change is not
    /// allowed (including any change out of a terminal state).
    pub fn apply(
        &mut self,
        update: OrderUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), (OrderStatus, OrderStatus)> {
        if let Some(next) = update.status.filter(|next| *next != self.status) {
            if !self.status.can_transition_to(next) {
                return Err((self.status, next));
            }
            self.status = next;
        }
        if let Some(payment) = update.payment_status {
            self.payment_status = payment;
        }
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order() -> Order {
        let now = Utc::now();
        NewOrder {
            user_id: UserId::new("u1"),
            user_email: Email::parse("buyer@example.com").unwrap(),
            user_name: "Buyer".to_owned(),
            items: vec![OrderItem {
                product_id: ProductId::new("k1"),
                name: "Kitchen Faucet".to_owned(),
                price: Price::from_minor(19_999),
                quantity: 2,
                image: String::new(),
            }],
            total: Price::from_minor(39_998),
            status: OrderStatus::Pending,
            shipping_address: ShippingAddress {
                name: "Buyer".to_owned(),
                phone: "1".to_owned(),
                address: "Street".to_owned(),
                city: "Ankara".to_owned(),
                postal_code: None,
                additional_info: None,
            },
            payment_status: PaymentStatus::Pending,
            payment_method: PaymentMethod::CreditCard,
            created_at: now,
            updated_at: now,
        }
        .with_id(OrderId::new("o1"))
    }

    #[test]
    fn test_payment_confirmation_update() {
        let mut order = order();
        order.apply(OrderUpdate::payment_confirmed(), Utc::now()).unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.items[0].line_total(), Price::from_minor(39_998));
    }

    #[test]
    fn test_terminal_orders_reject_updates() {
        let mut order = order();
        order.status = OrderStatus::Cancelled;
        let result = order.apply(OrderUpdate::payment_confirmed(), Utc::now());
        assert_eq!(
            result,
            Err((OrderStatus::Cancelled, OrderStatus::Confirmed))
        );
        assert_eq!(order.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_shipping_address_requires_complete_profile() {
        let profile = Profile {
            name: Some("A".to_owned()),
            phone: Some("1".to_owned()),
            address: Some("Street".to_owned()),
            city: None,
            ..Profile::default()
        };
        assert_eq!(
            ShippingAddress::from_profile(&profile),
            Err(vec![ProfileField::City])
        );
    }
}
