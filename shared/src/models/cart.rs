//! Cart Data
//!
//! 购物车：菜品 ID -> 数量 的映射。不存在的键视为数量 0。

use crate::models::FoodItem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-user cart mapping (item id -> positive quantity).
///
/// Invariant: stored quantities are strictly positive; an entry is removed
/// the moment its quantity reaches zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CartData(pub BTreeMap<String, u32>);

impl CartData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantity for an item; absent entries are zero.
    pub fn quantity(&self, item_id: &str) -> u32 {
        self.0.get(item_id).copied().unwrap_or(0)
    }

    /// Increment an item's quantity by one, creating the entry at 1.
    pub fn increment(&mut self, item_id: &str) {
        *self.0.entry(item_id.to_string()).or_insert(0) += 1;
    }

    /// Decrement an item's quantity, removing the entry at zero.
    /// No-op when the entry is absent.
    pub fn decrement(&mut self, item_id: &str) {
        if let Some(qty) = self.0.get_mut(item_id) {
            *qty = qty.saturating_sub(1);
            if *qty == 0 {
                self.0.remove(item_id);
            }
        }
    }

    /// Restore an item to an explicit quantity (rollback path).
    /// Zero removes the entry.
    pub fn restore(&mut self, item_id: &str, quantity: u32) {
        if quantity == 0 {
            self.0.remove(item_id);
        } else {
            self.0.insert(item_id.to_string(), quantity);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u32)> {
        self.0.iter()
    }

    /// Cart subtotal priced against a catalog listing.
    /// Items missing from the listing contribute nothing.
    pub fn subtotal(&self, food_list: &[FoodItem]) -> f64 {
        self.0
            .iter()
            .filter_map(|(id, qty)| {
                food_list
                    .iter()
                    .find(|f| &f.id == id)
                    .map(|f| f.price * f64::from(*qty))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FoodCategory;

    fn food(id: &str, price: f64) -> FoodItem {
        FoodItem {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            price,
            category: FoodCategory::Salad,
            image: String::new(),
        }
    }

    #[test]
    fn increment_creates_entry() {
        let mut cart = CartData::new();
        cart.increment("food:a");
        cart.increment("food:a");
        assert_eq!(cart.quantity("food:a"), 2);
    }

    #[test]
    fn decrement_removes_at_zero() {
        let mut cart = CartData::new();
        cart.increment("food:a");
        cart.decrement("food:a");
        assert_eq!(cart.quantity("food:a"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn decrement_absent_is_noop() {
        let mut cart = CartData::new();
        cart.decrement("food:missing");
        assert!(cart.is_empty());
    }

    #[test]
    fn subtotal_skips_unknown_items() {
        let mut cart = CartData::new();
        cart.increment("food:a");
        cart.increment("food:a");
        cart.increment("food:gone");
        let list = vec![food("food:a", 250.0)];
        assert_eq!(cart.subtotal(&list), 500.0);
    }
}
