//! Bistro Core - Cart state engine.
//!
//! This crate owns the authoritative cart state for the Bistro storefront:
//! line items, aggregate computation, the incremental view-sync planner, and
//! the order checkout state machine.
//!
//! # Architecture
//!
//! The core crate contains only state and types - no I/O, no HTTP, no
//! rendering surface. The view layer (the `storefront` crate) drives it
//! through [`session::CartSession`] and replays the [`sync::ViewPatch`]
//! commands it hands back against whatever it draws with.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, and catalog products
//! - [`cart`] - The line-item store and its mutation operations
//! - [`sync`] - Incremental view synchronization planner
//! - [`checkout`] - Order submission state machine
//! - [`session`] - Controller tying cart, modal state, and checkout together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod session;
pub mod sync;
pub mod types;

pub use cart::{Cart, CartChange, CartError, LineItem};
pub use checkout::{Checkout, CheckoutError, CheckoutState, DeliveryDetails};
pub use session::{CartSession, ModalView};
pub use sync::ViewPatch;
pub use types::*;
