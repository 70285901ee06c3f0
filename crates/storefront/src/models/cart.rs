//! Session cart.
//!
//! The cart only stores product IDs, quantities and notes. Prices are
//! always read from the catalog when the cart is displayed or checked out.

use serde::{Deserialize, Serialize};

use printshop_core::ProductId;

/// Largest quantity accepted for a single line.
pub const MAX_LINE_QUANTITY: u32 = 100_000;

/// Maximum length of per-line print notes.
pub const MAX_NOTES_LENGTH: usize = 500;

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Print instructions (paper, finishing, artwork link).
    #[serde(default)]
    pub notes: Option<String>,
}

/// Cart stored in the session under [`super::session_keys::CART`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Add a product, merging with an existing line for the same product.
    ///
    /// The resulting quantity is clamped to `min_quantity..=MAX_LINE_QUANTITY`.
    pub fn add(&mut self, product_id: ProductId, quantity: u32, min_quantity: u32, notes: Option<String>) {
        let notes = clean_notes(notes);
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = clamp_quantity(item.quantity.saturating_add(quantity), min_quantity);
            if notes.is_some() {
                item.notes = notes;
            }
        } else {
            self.items.push(CartItem {
                product_id,
                quantity: clamp_quantity(quantity, min_quantity),
                notes,
            });
        }
    }

    /// Set a line's quantity. A quantity of zero removes the line.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn update(&mut self, product_id: ProductId, quantity: u32, min_quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove(product_id);
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = clamp_quantity(quantity, min_quantity);
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns `false` if it was not present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Product IDs in cart order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.items.iter().map(|i| i.product_id).collect()
    }
}

/// Clamp a requested quantity to the product minimum and the line maximum.
#[must_use]
pub fn clamp_quantity(quantity: u32, min_quantity: u32) -> u32 {
    quantity.clamp(min_quantity.max(1), MAX_LINE_QUANTITY.max(min_quantity))
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().chars().take(MAX_NOTES_LENGTH).collect::<String>())
        .filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARDS: ProductId = ProductId::new(1);
    const FLYERS: ProductId = ProductId::new(2);

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::default();
        cart.add(CARDS, 100, 100, None);
        cart.add(CARDS, 50, 100, Some("matte".to_string()));

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 150);
        assert_eq!(cart.items[0].notes.as_deref(), Some("matte"));
    }

    #[test]
    fn test_add_clamps_to_min_quantity() {
        let mut cart = Cart::default();
        cart.add(CARDS, 10, 100, None);
        assert_eq!(cart.items[0].quantity, 100);
    }

    #[test]
    fn test_update_zero_removes() {
        let mut cart = Cart::default();
        cart.add(CARDS, 100, 1, None);
        cart.add(FLYERS, 5, 1, None);

        assert!(cart.update(CARDS, 0, 1));
        assert_eq!(cart.product_ids(), vec![FLYERS]);
        assert!(!cart.update(CARDS, 3, 1));
    }

    #[test]
    fn test_total_quantity() {
        let mut cart = Cart::default();
        cart.add(CARDS, 100, 1, None);
        cart.add(FLYERS, 5, 1, None);
        assert_eq!(cart.total_quantity(), 105);
    }

    #[test]
    fn test_blank_notes_dropped() {
        let mut cart = Cart::default();
        cart.add(CARDS, 1, 1, Some("   ".to_string()));
        assert_eq!(cart.items[0].notes, None);
    }

    #[test]
    fn test_clamp_quantity_upper_bound() {
        assert_eq!(clamp_quantity(u32::MAX, 1), MAX_LINE_QUANTITY);
        assert_eq!(clamp_quantity(0, 0), 1);
    }
}
