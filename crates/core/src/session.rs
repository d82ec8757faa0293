//! Cart session controller.
//!
//! [`CartSession`] ties the line-item store, the modal-open flag, and the
//! checkout state machine together and is the single entry point the view
//! layer drives. Mutations return the [`ViewPatch`] plan for the view layer
//! to replay; views never touch cart state directly.

use crate::cart::{Cart, CartChange, CartError, LineItem};
use crate::checkout::{Checkout, CheckoutError, CheckoutState, DeliveryDetails};
use crate::sync::{self, ViewPatch};
use crate::types::{OrderId, Price, Product, ProductId};

/// Title shown on a freshly opened cart modal.
pub const MODAL_TITLE: &str = "Your order";

/// Title shown once an order went through.
pub const SUCCESS_TITLE: &str = "Success!";

/// Snapshot handed to the modal builder when the cart view opens.
#[derive(Debug, Clone)]
pub struct ModalView {
    pub title: &'static str,
    pub lines: Vec<LineItem>,
    /// Prefill for the delivery form.
    pub delivery: DeliveryDetails,
    pub total_price: Price,
}

/// Controller owning cart state, modal visibility, and checkout progress.
#[derive(Debug, Default)]
pub struct CartSession {
    cart: Cart,
    modal_open: bool,
    checkout: Checkout,
}

impl CartSession {
    /// Create a session with an empty cart and no modal.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cart: Cart::new(),
            modal_open: false,
            checkout: Checkout::new(),
        }
    }

    /// Read access to the cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current checkout state.
    #[must_use]
    pub const fn checkout_state(&self) -> &CheckoutState {
        self.checkout.state()
    }

    /// Whether the cart modal is currently showing.
    #[must_use]
    pub const fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    /// Add one unit of a product and plan the view updates.
    ///
    /// # Errors
    ///
    /// `CheckoutInProgress` while an order submission is in flight.
    pub fn add_product(&mut self, product: &Product) -> Result<Vec<ViewPatch>, CartError> {
        self.ensure_unlocked()?;
        let change = self.cart.add_product(product);
        Ok(self.sync(&change))
    }

    /// Adjust a line item's count and plan the view updates.
    ///
    /// # Errors
    ///
    /// `CheckoutInProgress` while an order submission is in flight, plus the
    /// store's own `ProductNotFound`/`CountUnderflow` failures.
    pub fn update_count(
        &mut self,
        id: &ProductId,
        amount: i64,
    ) -> Result<Vec<ViewPatch>, CartError> {
        self.ensure_unlocked()?;
        let change = self.cart.update_count(id, amount)?;
        Ok(self.sync(&change))
    }

    /// Open the cart modal and hand back everything its builder needs.
    ///
    /// Called once per modal-open request; the snapshot covers the full
    /// build (line items, prefilled delivery form, current total). All
    /// later changes flow through the incremental patch plans.
    pub fn open_modal(&mut self) -> ModalView {
        self.modal_open = true;
        ModalView {
            title: MODAL_TITLE,
            lines: self.cart.items().to_vec(),
            delivery: DeliveryDetails::default(),
            total_price: self.cart.total_price(),
        }
    }

    /// Note that the view layer closed the modal.
    pub fn modal_closed(&mut self) {
        self.modal_open = false;
    }

    /// Start an order submission with the captured form details.
    ///
    /// # Errors
    ///
    /// `EmptyCart` if there is nothing to order, `AlreadySubmitting` if a
    /// submission is in flight.
    pub fn begin_checkout(&mut self, details: DeliveryDetails) -> Result<(), CheckoutError> {
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        self.checkout.begin(details)
    }

    /// Record a successful submission: clear the cart and refresh the badge.
    ///
    /// The success view replaces the modal's line-item body wholesale, so no
    /// per-line patches are planned; only the badge needs a refresh.
    ///
    /// # Errors
    ///
    /// `NotSubmitting` if no submission is in flight.
    pub fn checkout_succeeded(&mut self, order: OrderId) -> Result<Vec<ViewPatch>, CheckoutError> {
        self.checkout.succeed(order)?;
        self.cart.clear();
        self.modal_open = false;
        Ok(vec![ViewPatch::Badge {
            total_count: 0,
            total_price: self.cart.total_price(),
        }])
    }

    /// Record a rejected submission; cart contents are kept intact.
    ///
    /// # Errors
    ///
    /// `NotSubmitting` if no submission is in flight.
    pub fn checkout_failed(&mut self, reason: impl Into<String>) -> Result<(), CheckoutError> {
        self.checkout.fail(reason)
    }

    fn sync(&mut self, change: &CartChange) -> Vec<ViewPatch> {
        let patches = sync::plan(&self.cart, change, self.modal_open);
        if patches.contains(&ViewPatch::CloseModal) {
            self.modal_open = false;
        }
        patches
    }

    const fn ensure_unlocked(&self) -> Result<(), CartError> {
        if self.checkout.is_busy() {
            return Err(CartError::CheckoutInProgress);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CurrencyCode;

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
    fn test_modal_snapshot_has_lines_and_prefill() {
        let mut session = CartSession::new();
        session.add_product(&product("p1", 1000)).unwrap();
        session.add_product(&product("p2", 500)).unwrap();

        let modal = session.open_modal();
        assert_eq!(modal.title, MODAL_TITLE);
        assert_eq!(modal.lines.len(), 2);
        assert_eq!(modal.delivery, DeliveryDetails::default());
        assert_eq!(
            modal.total_price,
            Price::from_cents(1500, CurrencyCode::EUR)
        );
        assert!(session.is_modal_open());
    }

    #[test]
    fn test_new_product_while_modal_open_inserts_line() {
        let mut session = CartSession::new();
        session.add_product(&product("p1", 1000)).unwrap();
        session.open_modal();

        let patches = session.add_product(&product("p2", 500)).unwrap();
        match patches.as_slice() {
            [
                ViewPatch::Badge { total_count: 2, .. },
                ViewPatch::InsertLine { item },
                ViewPatch::OrderTotal { .. },
            ] => {
                assert_eq!(item.product().id, ProductId::new("p2"));
                assert_eq!(item.count(), 1);
            }
            other => panic!("unexpected patch plan: {other:?}"),
        }
    }

    #[test]
    fn test_emptying_cart_flips_modal_flag() {
        let mut session = CartSession::new();
        session.add_product(&product("p1", 1000)).unwrap();
        session.open_modal();

        let patches = session.update_count(&ProductId::new("p1"), -1).unwrap();
        assert!(patches.contains(&ViewPatch::CloseModal));
        assert!(!session.is_modal_open());
    }

    #[test]
    fn test_cart_locked_while_submitting() {
        let mut session = CartSession::new();
        let p1 = product("p1", 1000);
        session.add_product(&p1).unwrap();
        session.begin_checkout(DeliveryDetails::default()).unwrap();

        assert_eq!(
            session.add_product(&p1).unwrap_err(),
            CartError::CheckoutInProgress
        );
        assert_eq!(
            session
                .update_count(&ProductId::new("p1"), 1)
                .unwrap_err(),
            CartError::CheckoutInProgress
        );
        assert_eq!(
            session
                .begin_checkout(DeliveryDetails::default())
                .unwrap_err(),
            CheckoutError::AlreadySubmitting
        );
    }

    #[test]
    fn test_empty_cart_cannot_checkout() {
        let mut session = CartSession::new();
        assert_eq!(
            session
                .begin_checkout(DeliveryDetails::default())
                .unwrap_err(),
            CheckoutError::EmptyCart
        );
    }

    #[test]
    fn test_success_clears_cart_and_refreshes_badge() {
        let mut session = CartSession::new();
        session.add_product(&product("p1", 1000)).unwrap();
        session.add_product(&product("p2", 500)).unwrap();
        session.open_modal();
        session.begin_checkout(DeliveryDetails::default()).unwrap();

        let patches = session.checkout_succeeded(OrderId::generate()).unwrap();
        assert!(session.cart().is_empty());
        assert_eq!(
            patches,
            [ViewPatch::Badge {
                total_count: 0,
                total_price: Price::zero(CurrencyCode::EUR),
            }]
        );
        assert!(matches!(
            session.checkout_state(),
            CheckoutState::Succeeded { .. }
        ));
    }

    #[test]
    fn test_failure_keeps_cart_and_unlocks() {
        let mut session = CartSession::new();
        let p1 = product("p1", 1000);
        session.add_product(&p1).unwrap();
        session.begin_checkout(DeliveryDetails::default()).unwrap();

        session.checkout_failed("endpoint returned 502").unwrap();
        assert_eq!(session.cart().total_count(), 1);

        // Edits and a fresh submission are allowed again
        session.add_product(&p1).unwrap();
        session.begin_checkout(DeliveryDetails::default()).unwrap();
    }
}
