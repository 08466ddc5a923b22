//! Cart store.
//!
//! An ordered list of line items, at most one per product id. Items hold a
//! snapshot of the product taken when it was first added. A quantity that
//! drops to zero or below removes the line; zero-quantity lines never exist.
//! The cart lives only as long as the session process.

use faucet_store_core::{Price, Product, ProductId};

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.line_total(self.quantity)
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of `product`, returning the line's new quantity.
    pub fn add_item(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.find_mut(&product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }
        self.items.push(CartItem {
            product: product.clone(),
            quantity: 1,
        });
        1
    }

    /// Set a line's quantity; `quantity <= 0` removes the line.
    ///
    /// Returns the resulting quantity, or `None` when the product is not
    /// (or no longer) in the cart. Unknown ids are ignored.
    pub fn set_quantity(&mut self, id: &ProductId, quantity: i64) -> Option<u32> {
        if quantity <= 0 {
            self.remove(id);
            return None;
        }
        let item = self.find_mut(id)?;
        item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        Some(item.quantity)
    }

    /// Remove a line entirely. Returns whether it was present.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product.id != id);
        self.items.len() != before
    }

    /// Sum of `price * quantity` over every line.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total number of units, as shown on the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |sum, item| sum.saturating_add(item.quantity))
    }

    /// Quantity of one product, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.items
            .iter()
            .find(|item| &item.product.id == id)
            .map_or(0, |item| item.quantity)
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empty the cart. Only called after a confirmed payment.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn find_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| &item.product.id == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;
    use faucet_store_core::{Category, ProductDraft};

    use super::*;

    pub(crate) fn product(id: &str, minor: u32) -> Product {
        ProductDraft {
            name: format!("Product {id}"),
            price: Price::from_minor(minor),
            image: Some(format!("https://img.example/{id}.jpg")),
            description: String::new(),
            category: Category::Kitchen,
            details: None,
            specs: None,
            stock: None,
            active: true,
        }
        .into_product(ProductId::new(id), Utc::now())
    }

    #[test]
    fn test_add_counts_calls_per_product() {
        let mut cart = Cart::new();
        let k1 = product("k1", 19_999);
        let b1 = product("b1", 14_999);
        for _ in 0..3 {
            cart.add_item(&k1);
        }
        assert_eq!(cart.add_item(&b1), 1);
        assert_eq!(cart.add_item(&k1), 4);

        assert_eq!(cart.quantity_of(&k1.id), 4);
        assert_eq!(cart.quantity_of(&b1.id), 1);
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_set_quantity_non_positive_removes() {
        let mut cart = Cart::new();
        let k1 = product("k1", 100);
        cart.add_item(&k1);
        cart.add_item(&k1);

        assert_eq!(cart.set_quantity(&k1.id, 0), None);
        assert!(cart.is_empty());

        cart.add_item(&k1);
        assert_eq!(cart.set_quantity(&k1.id, -5), None);
        assert_eq!(cart.quantity_of(&k1.id), 0);

        // Re-adding after removal starts over at one.
        assert_eq!(cart.add_item(&k1), 1);
    }

    #[test]
    fn test_set_quantity_positive_overrides() {
        let mut cart = Cart::new();
        let k1 = product("k1", 100);
        cart.add_item(&k1);
        assert_eq!(cart.set_quantity(&k1.id, 7), Some(7));
        assert_eq!(cart.set_quantity(&k1.id, 2), Some(2));
        assert_eq!(cart.quantity_of(&k1.id), 2);
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product("k1", 100));
        let before = cart.clone();
        assert_eq!(cart.set_quantity(&ProductId::new("zz"), 0), None);
        assert_eq!(cart.set_quantity(&ProductId::new("zz"), 3), None);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_total() {
        let mut cart = Cart::new();
        assert_eq!(cart.total(), Price::ZERO);

        let k1 = product("k1", 19_999);
        cart.add_item(&k1);
        cart.add_item(&k1);
        cart.add_item(&product("a1", 4_999));
        assert_eq!(cart.total(), Price::from_minor(44_997));

        cart.clear();
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_total_at_largest_price_does_not_overflow() {
        let mut cart = Cart::new();
        let mut k1 = product("k1", 0);
        k1.price = Price::MAX;
        cart.add_item(&k1);
        cart.add_item(&k1);
        assert_eq!(cart.total().to_string(), "1999999999.98");

        cart.set_quantity(&k1.id, i64::from(u32::MAX));
        assert!(cart.total() > Price::MAX);
    }

    #[test]
    fn test_cart_keeps_snapshot() {
        let mut cart = Cart::new();
        let mut k1 = product("k1", 19_999);
        cart.add_item(&k1);
        k1.price = Price::from_minor(1);
        cart.add_item(&k1);
        assert_eq!(cart.total(), Price::from_minor(39_998));
    }
}
