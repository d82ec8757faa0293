//! Incremental view synchronization planner.
//!
//! Every cart mutation ends in a single sync pass. The pass is expressed as
//! an ordered list of [`ViewPatch`] commands rather than direct rendering
//! calls, so the store carries no rendering surface at all: a view layer
//! replays the commands against whatever it draws with, and tests assert on
//! the plan itself.
//!
//! The contract is incremental, not re-render: when a quantity changes while
//! the cart modal is open, only the affected line's quantity and price nodes
//! plus the order total are touched. The order form is never rebuilt, so
//! user-entered delivery data survives cart adjustments mid-checkout.

use crate::cart::{Cart, CartChange, LineItem};
use crate::types::{Price, ProductId};

/// A targeted view update produced by a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPatch {
    /// Refresh the cart icon badge with the current aggregates.
    Badge {
        total_count: u32,
        total_price: Price,
    },
    /// Close the cart modal; the cart just became empty.
    CloseModal,
    /// Append a full line for a product the open modal has not rendered yet.
    InsertLine { item: LineItem },
    /// Patch one line's quantity and line-price nodes.
    UpdateLine {
        id: ProductId,
        count: u32,
        line_price: Price,
    },
    /// Remove one line's subtree.
    RemoveLine { id: ProductId },
    /// Patch the order-total display.
    OrderTotal { total_price: Price },
}

/// Plan the view updates for one cart mutation.
///
/// In order:
/// 1. The badge is always refreshed with the current aggregates.
/// 2. If the modal is closed, nothing else happens.
/// 3. If the cart emptied out, the modal is closed.
/// 4. Otherwise the affected line and the order total are patched.
#[must_use]
pub fn plan(cart: &Cart, change: &CartChange, modal_open: bool) -> Vec<ViewPatch> {
    let mut patches = vec![ViewPatch::Badge {
        total_count: cart.total_count(),
        total_price: cart.total_price(),
    }];

    if !modal_open {
        return patches;
    }

    if cart.is_empty() {
        patches.push(ViewPatch::CloseModal);
        return patches;
    }

    match change {
        // A brand-new line has no nodes in the open modal to patch, so the
        // full line item is carried for the view layer to append.
        CartChange::LineAdded { id, .. } => {
            if let Some(item) = cart.line(id) {
                patches.push(ViewPatch::InsertLine { item: item.clone() });
            }
        }
        CartChange::LineChanged {
            id,
            count,
            line_price,
        } => patches.push(ViewPatch::UpdateLine {
            id: id.clone(),
            count: *count,
            line_price: *line_price,
        }),
        CartChange::LineRemoved { id } => patches.push(ViewPatch::RemoveLine { id: id.clone() }),
        // A cleared cart is empty and was handled above
        CartChange::Cleared => {}
    }

    patches.push(ViewPatch::OrderTotal {
        total_price: cart.total_price(),
    });
    patches
}
