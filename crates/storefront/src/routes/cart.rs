//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation responds with the rendered out-of-band fragments for the
//! patch plan the cart session hands back: the badge always, plus - when the
//! modal is open - the affected line's quantity/price nodes and the order
//! total. The order form itself is never part of a patch response, so
//! user-entered delivery data survives quantity changes mid-checkout.

use std::sync::{Arc, Mutex};

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use bistro_core::{
    CartSession, DeliveryDetails, LineItem, Price, ProductId, ViewPatch,
    session::SUCCESS_TITLE,
};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CartSessionId;
use crate::state::{AppState, lock_session};

/// Event name fired at the browser when the cart modal should close.
pub const CLOSE_MODAL_EVENT: &str = "cart-modal-close";

// =============================================================================
// View Data
// =============================================================================

/// Line item display data for templates.
#[derive(Clone)]
pub struct LineItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub count: u32,
    pub line_price: Price,
}

impl From<&LineItem> for LineItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            id: line.product().id.to_string(),
            name: line.product().name.clone(),
            image: line.product().image.clone(),
            count: line.count(),
            line_price: line.line_price(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_badge.html")]
pub struct BadgeTemplate {
    pub count: u32,
    pub total: Price,
    /// Render as an out-of-band swap instead of an in-place fragment.
    pub oob: bool,
}

/// Cart modal template: line items plus the order form.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_modal.html")]
pub struct ModalTemplate {
    pub title: &'static str,
    pub lines: Vec<LineItemView>,
    pub delivery: DeliveryDetails,
    pub total: Price,
}

/// A full line appended to the open modal's line list (out-of-band).
#[derive(Template)]
#[template(path = "partials/line_insert.html")]
struct LineInsertTemplate {
    line: LineItemView,
}

/// One line's quantity/price node patch (out-of-band).
#[derive(Template)]
#[template(path = "partials/line_patch.html")]
struct LinePatchTemplate {
    id: String,
    count: u32,
    line_price: Price,
}

/// Removal of one line's subtree (out-of-band).
#[derive(Template)]
#[template(path = "partials/line_remove.html")]
struct LineRemoveTemplate {
    id: String,
}

/// Order-total node patch (out-of-band).
#[derive(Template)]
#[template(path = "partials/order_total.html")]
struct OrderTotalTemplate {
    total: Price,
}

/// Confirmation view shown after a successful order.
#[derive(Template)]
#[template(path = "partials/order_success.html")]
struct SuccessTemplate {
    title: &'static str,
}

/// Error banner shown inside the order form on a failed submission.
#[derive(Template)]
#[template(path = "partials/order_error.html")]
struct OrderErrorTemplate {
    message: &'static str,
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
}

/// Quantity adjustment form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub amount: i64,
}

// =============================================================================
// Patch Rendering
// =============================================================================

/// Rendered patch plan: fragment markup plus the close-modal signal.
struct PatchFragments {
    html: String,
    close_modal: bool,
}

/// Render a patch plan into out-of-band HTMX fragments.
fn render_patches(patches: &[ViewPatch]) -> std::result::Result<PatchFragments, askama::Error> {
    let mut html = String::new();
    let mut close_modal = false;

    for patch in patches {
        match patch {
            ViewPatch::Badge {
                total_count,
                total_price,
            } => html.push_str(
                &BadgeTemplate {
                    count: *total_count,
                    total: *total_price,
                    oob: true,
                }
                .render()?,
            ),
            ViewPatch::CloseModal => close_modal = true,
            ViewPatch::InsertLine { item } => html.push_str(
                &LineInsertTemplate {
                    line: LineItemView::from(item),
                }
                .render()?,
            ),
            ViewPatch::UpdateLine {
                id,
                count,
                line_price,
            } => html.push_str(
                &LinePatchTemplate {
                    id: id.to_string(),
                    count: *count,
                    line_price: *line_price,
                }
                .render()?,
            ),
            ViewPatch::RemoveLine { id } => {
                html.push_str(&LineRemoveTemplate { id: id.to_string() }.render()?);
            }
            ViewPatch::OrderTotal { total_price } => {
                html.push_str(&OrderTotalTemplate { total: *total_price }.render()?);
            }
        }
    }

    Ok(PatchFragments { html, close_modal })
}

/// Turn rendered fragments into the HTTP response, signalling a modal close
/// to the browser through an `HX-Trigger` event when needed.
fn patch_response(fragments: PatchFragments) -> Response {
    if fragments.close_modal {
        (
            AppendHeaders([("HX-Trigger", CLOSE_MODAL_EVENT)]),
            Html(fragments.html),
        )
            .into_response()
    } else {
        Html(fragments.html).into_response()
    }
}

// =============================================================================
// Submission Guard
// =============================================================================

/// Re-arms the checkout if the handler future is dropped mid-submission.
///
/// Hyper cancels the handler when the client disconnects. Without this, a
/// disconnect between `begin_checkout` and the completion transition would
/// leave the session `Submitting` forever, rejecting every later mutation.
struct SubmissionGuard {
    session: Arc<Mutex<CartSession>>,
    armed: bool,
}

impl SubmissionGuard {
    fn new(session: Arc<Mutex<CartSession>>) -> Self {
        Self {
            session,
            armed: true,
        }
    }

    /// The submission completed; the handler owns the transition again.
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut session) = self.session.lock() {
            let _ = session.checkout_failed("connection closed mid-submission");
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Cart badge fragment.
#[instrument(skip(state))]
pub async fn badge(
    State(state): State<AppState>,
    Extension(CartSessionId(session_id)): Extension<CartSessionId>,
) -> Result<BadgeTemplate> {
    let session = state.session(session_id);
    let session = lock_session(&session)?;
    let cart = session.cart();

    Ok(BadgeTemplate {
        count: cart.total_count(),
        total: cart.total_price(),
        oob: false,
    })
}

/// Add one unit of a product to the cart (HTMX).
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Extension(CartSessionId(session_id)): Extension<CartSessionId>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("product: {id}")))?
        .clone();

    let session = state.session(session_id);
    let patches = lock_session(&session)?.add_product(&product)?;

    Ok(patch_response(render_patches(&patches)?))
}

/// Open the cart modal: line items plus the order form (HTMX).
#[instrument(skip(state))]
pub async fn modal(
    State(state): State<AppState>,
    Extension(CartSessionId(session_id)): Extension<CartSessionId>,
) -> Result<ModalTemplate> {
    let session = state.session(session_id);
    let view = lock_session(&session)?.open_modal();

    Ok(ModalTemplate {
        title: view.title,
        lines: view.lines.iter().map(LineItemView::from).collect(),
        delivery: view.delivery,
        total: view.total_price,
    })
}

/// Note that the browser closed the cart modal.
#[instrument(skip(state))]
pub async fn modal_close(
    State(state): State<AppState>,
    Extension(CartSessionId(session_id)): Extension<CartSessionId>,
) -> Result<StatusCode> {
    let session = state.session(session_id);
    lock_session(&session)?.modal_closed();
    Ok(StatusCode::NO_CONTENT)
}

/// Adjust a line item's quantity (HTMX, ±1 from the modal's counters).
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Extension(CartSessionId(session_id)): Extension<CartSessionId>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);

    let session = state.session(session_id);
    let patches = lock_session(&session)?.update_count(&id, form.amount)?;

    Ok(patch_response(render_patches(&patches)?))
}

/// Submit the order form.
///
/// Serializes the delivery fields, marks the session busy, POSTs to the
/// order endpoint, and on success swaps in the confirmation view with the
/// cart cleared. On failure the checkout is re-armed and only the form's
/// status area is retargeted, keeping the entered delivery data.
#[instrument(skip(state, details))]
pub async fn order(
    State(state): State<AppState>,
    Extension(CartSessionId(session_id)): Extension<CartSessionId>,
    Form(details): Form<DeliveryDetails>,
) -> Result<Response> {
    let session = state.session(session_id);
    // Lock released before the network await; edits stay rejected through
    // the checkout state machine while the submission is in flight.
    lock_session(&session)?.begin_checkout(details.clone())?;

    let mut submission = SubmissionGuard::new(Arc::clone(&session));
    let placed = state.orders().place_order(&details).await;
    submission.disarm();

    let mut guard = lock_session(&session)?;
    match placed {
        Ok(order) => {
            let patches = guard.checkout_succeeded(order)?;
            let fragments = render_patches(&patches)?;

            let mut html = SuccessTemplate {
                title: SUCCESS_TITLE,
            }
            .render()?;
            html.push_str(&fragments.html);
            Ok(Html(html).into_response())
        }
        Err(err) => {
            tracing::warn!(error = %err, "order submission failed");
            guard.checkout_failed(err.to_string())?;

            let banner = OrderErrorTemplate {
                message: "We could not place your order. Please try again.",
            }
            .render()?;
            Ok((
                AppendHeaders([("HX-Retarget", "#order-status"), ("HX-Reswap", "innerHTML")]),
                Html(banner),
            )
                .into_response())
        }
    }
}
