//! # Cart State
//!
//! Manages the current shopping cart state.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Both the storefront UI and the checkout flow access the cart
//! 2. Only one caller should modify the cart at a time
//! 3. Checkout submission snapshots the cart while other edits may race
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Storefront Action          Operation              Cart State Change    │
//! │  ─────────────────          ─────────              ─────────────────    │
//! │                                                                         │
//! │  Click Product ───────────► add_item() ──────────► items.push(item)    │
//! │                                                                         │
//! │  Change Quantity ─────────► update_quantity() ───► items[i].qty = n    │
//! │                                                                         │
//! │  Click Remove ────────────► remove_item() ───────► items.remove(i)     │
//! │                                                                         │
//! │  Order Submitted ─────────► clear() ─────────────► items.clear()       │
//! │                                                                         │
//! │  Checkout Pricing ────────► (read only snapshot)                        │
//! │                                                                         │
//! │  NOTE: All write operations acquire the Mutex lock exclusively.         │
//! │        Read operations also acquire the lock but release it quickly.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vitrine_core::{CartItem, Money};

/// Cart manipulation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("cart cannot have more than {max} items")]
    TooManyItems { max: usize },

    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    #[error("quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    #[error("unit price cannot be negative, got {0}")]
    NegativePrice(i64),

    #[error("item {0} not in cart")]
    NotInCart(String),
}

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `id` (adding the same product increases quantity)
/// - Quantity is always > 0 (updating to 0 removes the item)
/// - Maximum distinct items: 100 (configured in vitrine-core)
/// - Maximum quantity per item: 999 (configured in vitrine-core)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Items in the cart
    pub items: Vec<CartItem>,

    /// When the cart was created/last cleared
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            items: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Adds an item to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - If the product is already in the cart: increases quantity,
    ///   keeping the originally frozen price
    /// - If not: appends the item
    ///
    /// Quantity must be 1..=MAX_ITEM_QUANTITY and the frozen price
    /// non-negative; pricing downstream assumes both.
    pub fn add_item(&mut self, item: CartItem) -> Result<(), CartError> {
        if item.quantity < 1 {
            return Err(CartError::InvalidQuantity(item.quantity));
        }
        if item.unit_price_cents < 0 {
            return Err(CartError::NegativePrice(item.unit_price_cents));
        }
        if item.quantity > vitrine_core::MAX_ITEM_QUANTITY {
            return Err(CartError::QuantityTooLarge {
                requested: item.quantity,
                max: vitrine_core::MAX_ITEM_QUANTITY,
            });
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            let new_qty = existing.quantity + item.quantity;
            if new_qty > vitrine_core::MAX_ITEM_QUANTITY {
                return Err(CartError::QuantityTooLarge {
                    requested: new_qty,
                    max: vitrine_core::MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= vitrine_core::MAX_CART_ITEMS {
            return Err(CartError::TooManyItems {
                max: vitrine_core::MAX_CART_ITEMS,
            });
        }

        self.items.push(item);
        Ok(())
    }

    /// Updates the quantity of an item in the cart.
    ///
    /// ## Behavior
    /// - If quantity is 0: removes the item
    /// - If quantity is negative: returns an error
    /// - If the item is not in the cart: returns an error
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_item(id);
        }

        if quantity < 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        if quantity > vitrine_core::MAX_ITEM_QUANTITY {
            return Err(CartError::QuantityTooLarge {
                requested: quantity,
                max: vitrine_core::MAX_ITEM_QUANTITY,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.quantity = quantity;
            Ok(())
        } else {
            Err(CartError::NotInCart(id.to_string()))
        }
    }

    /// Removes an item from the cart by product ID.
    pub fn remove_item(&mut self, id: &str) -> Result<(), CartError> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != id);

        if self.items.len() == initial_len {
            Err(CartError::NotInCart(id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.created_at = Utc::now();
    }

    /// Returns the number of unique items in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity of all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of line totals before shipping and discounts.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Shared cart state.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Cart>>` because:
/// - `Arc`: Allows shared ownership across threads
/// - `Mutex`: Ensures only one thread modifies the cart at a time
///
/// ## Why Not RwLock?
/// Cart operations are typically quick, and most operations modify state.
/// A RwLock would add complexity with minimal benefit.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let subtotal = cart_state.with_cart(|cart| cart.subtotal());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.add_item(item))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().expect("Cart mutex poisoned");
        f(&mut cart)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_item(id: &str, price_cents: i64, quantity: i64) -> CartItem {
        CartItem::new(id, format!("Produto {id}"), price_cents, quantity, None)
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new();

        cart.add_item(test_item("1", 999, 2)).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 1998); // R$ 19.98
    }

    #[test]
    fn test_cart_add_same_product_merges() {
        let mut cart = Cart::new();

        cart.add_item(test_item("1", 999, 2)).unwrap();
        cart.add_item(test_item("1", 999, 3)).unwrap();

        assert_eq!(cart.item_count(), 1); // Still one unique item
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_merge_keeps_frozen_price() {
        let mut cart = Cart::new();

        cart.add_item(test_item("1", 999, 1)).unwrap();
        // Same product comes back with a new catalog price
        cart.add_item(test_item("1", 1_299, 1)).unwrap();

        assert_eq!(cart.items[0].unit_price_cents, 999);
        assert_eq!(cart.subtotal().cents(), 1998);
    }

    #[test]
    fn test_cart_update_quantity() {
        let mut cart = Cart::new();
        cart.add_item(test_item("1", 999, 2)).unwrap();

        cart.update_quantity("1", 5).unwrap();
        assert_eq!(cart.total_quantity(), 5);

        // Zero removes the item
        cart.update_quantity("1", 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_quantity_cap() {
        let mut cart = Cart::new();
        cart.add_item(test_item("1", 999, 998)).unwrap();

        let err = cart.add_item(test_item("1", 999, 2)).unwrap_err();
        assert_eq!(
            err,
            CartError::QuantityTooLarge {
                requested: 1_000,
                max: vitrine_core::MAX_ITEM_QUANTITY
            }
        );
        // The failed merge must not change the cart
        assert_eq!(cart.total_quantity(), 998);
    }

    /// A non-positive quantity must never enter the cart: it would
    /// flow into pricing and produce a negative subtotal.
    #[test]
    fn test_cart_rejects_non_positive_quantity() {
        let mut cart = Cart::new();

        assert_eq!(
            cart.add_item(test_item("1", 999, -5)).unwrap_err(),
            CartError::InvalidQuantity(-5)
        );
        assert_eq!(
            cart.add_item(test_item("1", 999, 0)).unwrap_err(),
            CartError::InvalidQuantity(0)
        );
        assert!(cart.is_empty());
        assert!(!cart.subtotal().is_negative());

        cart.add_item(test_item("1", 999, 2)).unwrap();
        assert_eq!(
            cart.update_quantity("1", -3).unwrap_err(),
            CartError::InvalidQuantity(-3)
        );
        // The failed update must not change the cart
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 1998);
    }

    #[test]
    fn test_cart_rejects_negative_price() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add_item(test_item("1", -999, 1)).unwrap_err(),
            CartError::NegativePrice(-999)
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_unknown_item() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.remove_item("ghost").unwrap_err(),
            CartError::NotInCart("ghost".to_string())
        );
        assert_eq!(
            cart.update_quantity("ghost", 2).unwrap_err(),
            CartError::NotInCart("ghost".to_string())
        );
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new();
        cart.add_item(test_item("1", 999, 2)).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_state_shares_one_cart() {
        let state = CartState::new();
        let handle = state.clone();

        state
            .with_cart_mut(|cart| cart.add_item(test_item("1", 999, 1)))
            .unwrap();

        assert_eq!(handle.with_cart(|cart| cart.item_count()), 1);
    }
}
