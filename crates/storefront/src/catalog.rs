//! Product catalog.
//!
//! Products are loaded once at startup, either from a JSON file named in the
//! configuration or from the catalog bundled into the binary. The catalog is
//! immutable for the life of the process; the cart only ever receives
//! snapshots resolved through it.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use bistro_core::{Product, ProductId};

/// The catalog bundled into the binary, used when no file is configured.
const BUNDLED_CATALOG: &str = include_str!("../catalog.json");

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading the catalog file failed.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog JSON is malformed.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an id.
    #[error("duplicate product id in catalog: {0}")]
    DuplicateId(ProductId),
}

/// An immutable, ordered product catalog with id lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Load the catalog from `path`, or the bundled one if `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed, or if a
    /// product id appears twice.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?),
            None => Self::from_json(BUNDLED_CATALOG),
        }
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on malformed JSON or duplicate product ids.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;

        let mut by_id = HashMap::with_capacity(products.len());
        for (index, product) in products.iter().enumerate() {
            if by_id.insert(product.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        Ok(Self { products, by_id })
    }

    /// All products in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Resolve a product id to its catalog entry.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.by_id.get(id).and_then(|&index| self.products.get(index))
    }
}
