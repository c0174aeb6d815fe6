use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One line of a cart: a live menu item reference plus quantity. Unlike order
/// items, cart lines carry no price snapshot; display fields are re-resolved
/// on every read, so cart totals drift with menu edits until checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub menu_item: ObjectId,
    pub qty: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub items: Vec<CartItem>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Cart {
    /// Merge qty into an existing line or append a new one (floored, min 1).
    pub fn add_item(&mut self, menu_item: ObjectId, qty: f64) {
        let qty = (qty.floor() as i64).max(1) as u32;
        if let Some(line) = self.items.iter_mut().find(|i| i.menu_item == menu_item) {
            line.qty = line.qty.saturating_add(qty);
        } else {
            self.items.push(CartItem { menu_item, qty });
        }
    }

    /// Replace a line's quantity; qty <= 0 removes the line.
    /// Returns false when the item is not in the cart.
    pub fn set_qty(&mut self, menu_item: ObjectId, qty: f64) -> bool {
        let Some(idx) = self.items.iter().position(|i| i.menu_item == menu_item) else {
            return false;
        };
        let floored = qty.floor() as i64;
        if floored <= 0 {
            self.items.remove(idx);
        } else {
            self.items[idx].qty = floored as u32;
        }
        true
    }

    /// Returns false when the item is not in the cart.
    pub fn remove_item(&mut self, menu_item: ObjectId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.menu_item != menu_item);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_cart() -> Cart {
        Cart {
            id: None,
            user: ObjectId::new(),
            items: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_add_merges_quantity() {
        let mut cart = empty_cart();
        let item = ObjectId::new();
        cart.add_item(item, 2.0);
        cart.add_item(item, 3.0);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].qty, 5);
    }

    #[test]
    fn test_add_floors_and_clamps() {
        let mut cart = empty_cart();
        cart.add_item(ObjectId::new(), 2.9);
        cart.add_item(ObjectId::new(), 0.0);
        assert_eq!(cart.items[0].qty, 2);
        assert_eq!(cart.items[1].qty, 1);
    }

    #[test]
    fn test_set_qty_zero_removes_line() {
        let mut cart = empty_cart();
        let item = ObjectId::new();
        cart.add_item(item, 2.0);
        assert!(cart.set_qty(item, 0.0));
        assert!(cart.items.is_empty());
    }

    #[test]
    fn test_set_qty_replaces_floored() {
        let mut cart = empty_cart();
        let item = ObjectId::new();
        cart.add_item(item, 1.0);
        assert!(cart.set_qty(item, 4.7));
        assert_eq!(cart.items[0].qty, 4);
    }

    #[test]
    fn test_set_qty_missing_item() {
        let mut cart = empty_cart();
        assert!(!cart.set_qty(ObjectId::new(), 2.0));
    }

    #[test]
    fn test_remove_item() {
        let mut cart = empty_cart();
        let item = ObjectId::new();
        cart.add_item(item, 1.0);
        assert!(cart.remove_item(item));
        assert!(!cart.remove_item(item));
    }
}
