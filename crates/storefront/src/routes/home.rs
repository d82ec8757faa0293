//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Extension, extract::State};
use tracing::instrument;

use bistro_core::Product;

use crate::error::Result;
use crate::filters;
use crate::middleware::CartSessionId;
use crate::routes::cart::BadgeTemplate;
use crate::state::{AppState, lock_session};

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<Product>,
    /// Pre-rendered cart badge, identical to the fragment swapped in later.
    pub badge_html: String,
}

/// Display the product grid with the current cart badge.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Extension(CartSessionId(session_id)): Extension<CartSessionId>,
) -> Result<HomeTemplate> {
    let session = state.session(session_id);
    let session = lock_session(&session)?;
    let cart = session.cart();

    let badge_html = BadgeTemplate {
        count: cart.total_count(),
        total: cart.total_price(),
        oob: false,
    }
    .render()?;

    Ok(HomeTemplate {
        products: state.catalog().products().to_vec(),
        badge_html,
    })
}
