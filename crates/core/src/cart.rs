//! The cart line-item store.
//!
//! Holds the authoritative ordered list of line items and applies the
//! add/adjust/clear operations. At most one line item exists per product id,
//! and a present line item always has `count >= 1` - reaching zero removes
//! it. Aggregates are recomputed from the live items on every call, so reads
//! can never drift from the current state.

use serde::Serialize;
use thiserror::Error;

use crate::types::{CurrencyCode, Price, Product, ProductId};

/// Errors from cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No line item exists for the given product id.
    #[error("no line item for product: {0}")]
    ProductNotFound(ProductId),

    /// A count adjustment would take the quantity below zero.
    #[error("adjusting {id} by {amount} would drop the count below zero (currently {count})")]
    CountUnderflow {
        id: ProductId,
        count: u32,
        amount: i64,
    },

    /// A count adjustment would exceed the largest supported quantity.
    #[error("adjusting {id} by {amount} would exceed the maximum quantity (currently {count})")]
    CountOverflow {
        id: ProductId,
        count: u32,
        amount: i64,
    },

    /// The cart is locked while an order submission is in flight.
    #[error("an order submission is in flight; the cart is locked")]
    CheckoutInProgress,
}

/// One (product, quantity) pairing inside the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    product: Product,
    count: u32,
}

impl LineItem {
    fn new(product: Product) -> Self {
        Self { product, count: 1 }
    }

    /// The product snapshot captured on first add.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Current quantity; at least 1 while the line item exists.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Price for the whole line (unit price times count).
    #[must_use]
    pub fn line_price(&self) -> Price {
        self.product.price.times(self.count)
    }
}

/// The effect of a single cart mutation, handed to the sync planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A line item was created for a product the cart did not hold yet.
    LineAdded {
        id: ProductId,
        count: u32,
        line_price: Price,
    },
    /// An existing line item's count changed.
    LineChanged {
        id: ProductId,
        count: u32,
        line_price: Price,
    },
    /// A line item's count reached zero and it was removed.
    LineRemoved { id: ProductId },
    /// The whole cart was emptied.
    Cleared,
}

/// The line-item store.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of a product.
    ///
    /// Creates a line item with count 1 on first add (appended, so display
    /// order is insertion order) or increments the existing line.
    pub fn add_product(&mut self, product: &Product) -> CartChange {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product.id == product.id)
        {
            item.count = item.count.saturating_add(1);
            return CartChange::LineChanged {
                id: product.id.clone(),
                count: item.count,
                line_price: item.line_price(),
            };
        }

        let item = LineItem::new(product.clone());
        let change = CartChange::LineAdded {
            id: product.id.clone(),
            count: item.count,
            line_price: item.line_price(),
        };
        self.items.push(item);
        change
    }

    /// Adjust a line item's count by a signed amount (typically ±1).
    ///
    /// A count of zero removes the line item.
    ///
    /// # Errors
    ///
    /// `ProductNotFound` if no line item exists for `id`; `CountUnderflow`
    /// if the adjustment would take the count below zero; `CountOverflow`
    /// if it would exceed the largest supported quantity. Either way the
    /// cart is left untouched.
    pub fn update_count(&mut self, id: &ProductId, amount: i64) -> Result<CartChange, CartError> {
        let Some(pos) = self.items.iter().position(|item| &item.product.id == id) else {
            return Err(CartError::ProductNotFound(id.clone()));
        };
        let Some(item) = self.items.get_mut(pos) else {
            return Err(CartError::ProductNotFound(id.clone()));
        };

        let Some(next) = i64::from(item.count).checked_add(amount) else {
            return Err(CartError::CountOverflow {
                id: id.clone(),
                count: item.count,
                amount,
            });
        };
        if next < 0 {
            return Err(CartError::CountUnderflow {
                id: id.clone(),
                count: item.count,
                amount,
            });
        }
        if next > 0 {
            let count = u32::try_from(next).map_err(|_| CartError::CountOverflow {
                id: id.clone(),
                count: item.count,
                amount,
            })?;
            item.count = count;
            return Ok(CartChange::LineChanged {
                id: id.clone(),
                count,
                line_price: item.line_price(),
            });
        }

        self.items.remove(pos);
        Ok(CartChange::LineRemoved { id: id.clone() })
    }

    /// Empty the cart (post-order-success reset).
    pub fn clear(&mut self) -> CartChange {
        self.items.clear();
        CartChange::Cleared
    }

    /// True iff the cart holds no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line item counts.
    #[must_use]
    pub fn total_count(&self) -> u32 {
        self.items.iter().map(LineItem::count).sum()
    }

    /// Sum of all line prices.
    #[must_use]
    pub fn total_price(&self) -> Price {
        let currency = self
            .items
            .first()
            .map_or_else(CurrencyCode::default, |item| item.product.price.currency());
        self.items
            .iter()
            .fold(Price::zero(currency), |total, item| {
                total.plus(item.line_price())
            })
    }

    /// The line items in display (insertion) order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up one line item by product id.
    #[must_use]
    pub fn line(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.product.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_owned(),
            price: Price::from_cents(cents, CurrencyCode::EUR),
            image: format!("{id}.png"),
            category: None,
        }
    }

    #[test]
    fn test_first_add_creates_a_line() {
        let mut cart = Cart::new();
        let change = cart.add_product(&product("p1", 1000));

        assert_eq!(
            change,
            CartChange::LineAdded {
                id: ProductId::new("p1"),
                count: 1,
                line_price: Price::from_cents(1000, CurrencyCode::EUR),
            }
        );
    }

    #[test]
    fn test_add_twice_merges_into_one_line() {
        let mut cart = Cart::new();
        let p1 = product("p1", 1000);

        cart.add_product(&p1);
        let change = cart.add_product(&p1);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_count(), 2);
        assert_eq!(
            change,
            CartChange::LineChanged {
                id: ProductId::new("p1"),
                count: 2,
                line_price: Price::from_cents(2000, CurrencyCode::EUR),
            }
        );
    }

    #[test]
    fn test_display_order_is_insertion_order() {
        let mut cart = Cart::new();
        cart.add_product(&product("b", 100));
        cart.add_product(&product("a", 200));
        cart.add_product(&product("b", 100));

        let ids: Vec<&str> = cart
            .items()
            .iter()
            .map(|item| item.product().id.as_str())
            .collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_decrement_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_product(&product("p1", 1000));

        let change = cart.update_count(&ProductId::new("p1"), -1).expect("line exists");
        assert_eq!(
            change,
            CartChange::LineRemoved {
                id: ProductId::new("p1")
            }
        );
        assert!(cart.is_empty());
        assert_eq!(cart.total_price(), Price::zero(CurrencyCode::EUR));
    }

    #[test]
    fn test_update_missing_product_fails_loudly() {
        let mut cart = Cart::new();
        cart.add_product(&product("p1", 1000));

        let err = cart.update_count(&ProductId::new("ghost"), 1).unwrap_err();
        assert_eq!(err, CartError::ProductNotFound(ProductId::new("ghost")));
        // The cart is untouched
        assert_eq!(cart.total_count(), 1);
    }

    #[test]
    fn test_underflow_is_rejected_without_mutation() {
        let mut cart = Cart::new();
        cart.add_product(&product("p1", 1000));

        let err = cart.update_count(&ProductId::new("p1"), -2).unwrap_err();
        assert!(matches!(err, CartError::CountUnderflow { .. }));
        assert_eq!(cart.total_count(), 1);
    }

    #[test]
    fn test_overflow_is_rejected_without_mutation() {
        let mut cart = Cart::new();
        cart.add_product(&product("p1", 1000));

        // Past the largest representable count
        let err = cart
            .update_count(&ProductId::new("p1"), i64::from(u32::MAX))
            .unwrap_err();
        assert!(matches!(err, CartError::CountOverflow { .. }));
        assert_eq!(cart.total_count(), 1);

        // Past what the signed arithmetic itself can hold
        let err = cart.update_count(&ProductId::new("p1"), i64::MAX).unwrap_err();
        assert!(matches!(err, CartError::CountOverflow { .. }));
        assert_eq!(cart.total_count(), 1);
    }

    #[test]
    fn test_aggregates_follow_mutations() {
        let mut cart = Cart::new();
        let p1 = product("p1", 1000);
        let p2 = product("p2", 500);

        cart.add_product(&p1);
        assert_eq!(cart.total_count(), 1);
        assert_eq!(cart.total_price(), Price::from_cents(1000, CurrencyCode::EUR));

        cart.add_product(&p1);
        assert_eq!(cart.total_count(), 2);
        assert_eq!(cart.total_price(), Price::from_cents(2000, CurrencyCode::EUR));

        cart.add_product(&p2);
        assert_eq!(cart.total_price(), Price::from_cents(2500, CurrencyCode::EUR));

        cart.update_count(&ProductId::new("p1"), -1).expect("line exists");
        assert_eq!(cart.total_price(), Price::from_cents(1500, CurrencyCode::EUR));

        cart.update_count(&ProductId::new("p1"), -1).expect("line exists");
        assert_eq!(cart.total_price(), Price::from_cents(500, CurrencyCode::EUR));
        assert_eq!(cart.line(&ProductId::new("p1")), None);
    }

    #[test]
    fn test_is_empty_lifecycle() {
        let mut cart = Cart::new();
        assert!(cart.is_empty());

        cart.add_product(&product("p1", 1000));
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_count(), 0);
    }

    #[test]
    fn test_line_keeps_price_snapshot() {
        let mut cart = Cart::new();
        let original = product("p1", 1000);
        cart.add_product(&original);

        // A later catalog change must not affect the captured snapshot
        let mut repriced = original;
        repriced.price = Price::from_cents(9999, CurrencyCode::EUR);
        cart.add_product(&repriced);

        let line = cart.line(&ProductId::new("p1")).expect("line exists");
        assert_eq!(line.count(), 2);
        assert_eq!(line.line_price(), Price::from_cents(2000, CurrencyCode::EUR));
    }
}
