//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use bistro_core::Price;

/// Format a price with its currency symbol.
///
/// Usage in templates: `{{ product.price|money }}`
#[askama::filter_fn]
pub fn money(price: &Price, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(price.display())
}
