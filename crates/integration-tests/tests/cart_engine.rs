//! Scenario tests for the cart engine.
//!
//! These drive `bistro-core` directly, with no HTTP layer involved, and
//! assert the exact view-patch plans a front end would replay.

use bistro_core::{
    CartError, CartSession, CheckoutError, CheckoutState, CurrencyCode, DeliveryDetails, OrderId,
    Price, Product, ProductId, ViewPatch,
};

fn product(id: &str, cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        name: id.to_owned(),
        price: Price::from_cents(cents, CurrencyCode::EUR),
        image: format!("{id}.png"),
        category: None,
    }
}

fn eur(cents: i64) -> Price {
    Price::from_cents(cents, CurrencyCode::EUR)
}

// ============================================================================
// Badge-Only Updates (modal closed)
// ============================================================================

#[test]
fn test_adds_with_modal_closed_only_touch_the_badge() {
    let mut session = CartSession::new();
    let p1 = product("p1", 1000);

    let patches = session.add_product(&p1).unwrap();
    assert_eq!(
        patches,
        [ViewPatch::Badge {
            total_count: 1,
            total_price: eur(1000),
        }]
    );

    let patches = session.add_product(&p1).unwrap();
    assert_eq!(
        patches,
        [ViewPatch::Badge {
            total_count: 2,
            total_price: eur(2000),
        }]
    );
}

// ============================================================================
// Full Lifecycle (two-product walk-through)
// ============================================================================

#[test]
fn test_two_product_lifecycle_with_open_modal() {
    let mut session = CartSession::new();
    let p1 = product("p1", 1000);
    let p2 = product("p2", 550);

    session.add_product(&p1).unwrap();
    session.add_product(&p1).unwrap();
    session.add_product(&p2).unwrap();

    let modal = session.open_modal();
    assert_eq!(modal.lines.len(), 2);
    assert_eq!(modal.total_price, eur(2550));

    // Decrement p1: its line and the order total get patched in place.
    let patches = session.update_count(&ProductId::new("p1"), -1).unwrap();
    assert_eq!(
        patches,
        [
            ViewPatch::Badge {
                total_count: 2,
                total_price: eur(1550),
            },
            ViewPatch::UpdateLine {
                id: ProductId::new("p1"),
                count: 1,
                line_price: eur(1000),
            },
            ViewPatch::OrderTotal {
                total_price: eur(1550),
            },
        ]
    );

    // Decrement p1 to zero: the line disappears, p2 stays untouched.
    let patches = session.update_count(&ProductId::new("p1"), -1).unwrap();
    assert_eq!(
        patches,
        [
            ViewPatch::Badge {
                total_count: 1,
                total_price: eur(550),
            },
            ViewPatch::RemoveLine {
                id: ProductId::new("p1"),
            },
            ViewPatch::OrderTotal {
                total_price: eur(550),
            },
        ]
    );

    // Removing the last line closes the modal instead of patching it.
    let patches = session.update_count(&ProductId::new("p2"), -1).unwrap();
    assert_eq!(
        patches,
        [
            ViewPatch::Badge {
                total_count: 0,
                total_price: Price::zero(CurrencyCode::EUR),
            },
            ViewPatch::CloseModal,
        ]
    );
    assert!(!session.is_modal_open());
    assert!(session.cart().is_empty());
}

// ============================================================================
// Error Paths
// ============================================================================

#[test]
fn test_unknown_product_is_a_typed_error() {
    let mut session = CartSession::new();
    let err = session.update_count(&ProductId::new("ghost"), 1).unwrap_err();
    assert_eq!(err, CartError::ProductNotFound(ProductId::new("ghost")));
}

#[test]
fn test_underflow_is_rejected_and_leaves_the_line_alone() {
    let mut session = CartSession::new();
    session.add_product(&product("p1", 1000)).unwrap();

    let err = session.update_count(&ProductId::new("p1"), -2).unwrap_err();
    assert_eq!(
        err,
        CartError::CountUnderflow {
            id: ProductId::new("p1"),
            count: 1,
            amount: -2,
        }
    );
    assert_eq!(session.cart().total_count(), 1);
}

// ============================================================================
// Checkout Lifecycle
// ============================================================================

#[test]
fn test_checkout_success_resets_the_session() {
    let mut session = CartSession::new();
    session.add_product(&product("p1", 1000)).unwrap();
    session.open_modal();
    session.begin_checkout(DeliveryDetails::default()).unwrap();

    // Any edit mid-flight is rejected.
    assert_eq!(
        session.add_product(&product("p2", 550)).unwrap_err(),
        CartError::CheckoutInProgress
    );

    let patches = session.checkout_succeeded(OrderId::generate()).unwrap();
    assert_eq!(
        patches,
        [ViewPatch::Badge {
            total_count: 0,
            total_price: Price::zero(CurrencyCode::EUR),
        }]
    );
    assert!(session.cart().is_empty());
    assert!(!session.is_modal_open());
}

#[test]
fn test_checkout_failure_rearms_without_losing_the_cart() {
    let mut session = CartSession::new();
    session.add_product(&product("p1", 1000)).unwrap();
    session.begin_checkout(DeliveryDetails::default()).unwrap();

    session.checkout_failed("order endpoint returned 500").unwrap();
    assert!(matches!(
        session.checkout_state(),
        CheckoutState::Failed { .. }
    ));
    assert_eq!(session.cart().total_count(), 1);

    // A retry is possible straight away.
    session.begin_checkout(DeliveryDetails::default()).unwrap();
}

#[test]
fn test_double_submit_is_rejected() {
    let mut session = CartSession::new();
    session.add_product(&product("p1", 1000)).unwrap();
    session.begin_checkout(DeliveryDetails::default()).unwrap();

    assert_eq!(
        session
            .begin_checkout(DeliveryDetails::default())
            .unwrap_err(),
        CheckoutError::AlreadySubmitting
    );
}
