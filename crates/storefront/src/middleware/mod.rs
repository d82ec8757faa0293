//! HTTP middleware for the storefront.

pub mod session;

pub use session::{CartSessionId, SESSION_COOKIE, cart_session};
