//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (product grid + cart badge)
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart/badge             - Cart badge (fragment)
//! POST /cart/add               - Add a product (returns patch fragments)
//! GET  /cart/modal             - Cart modal: line items + order form
//! POST /cart/modal/close       - Note that the modal was closed
//! POST /cart/update            - Adjust a line's quantity (patch fragments)
//! POST /cart/order             - Submit the order form
//! ```

pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/badge", get(cart::badge))
        .route("/add", post(cart::add))
        .route("/modal", get(cart::modal))
        .route("/modal/close", post(cart::modal_close))
        .route("/update", post(cart::update))
        .route("/order", post(cart::order))
}

/// Create the combined application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .nest("/cart", cart_routes())
}

/// Build the full application, ready to serve or drive from tests.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .layer(axum::middleware::from_fn(middleware::cart_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
