//! Catalog product snapshot.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A product as offered by the catalog.
///
/// The cart captures a clone of this on first add, so a line item keeps the
/// attributes (notably the price) the customer saw when they added it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image path relative to the static assets root.
    pub image: String,
    #[serde(default)]
    pub category: Option<String>,
}
