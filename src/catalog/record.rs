//! Product records and catalog snapshots.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// One normalized price row.
///
/// Field names on the wire follow the sheet headers the pages and the
/// export artifact already use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Producto")]
    pub name: String,
    #[serde(rename = "USD")]
    pub price_usd: f64,
    #[serde(rename = "CUP")]
    pub price_cup: f64,
}

impl ProductRecord {
    pub fn new(name: impl Into<String>, price_usd: f64, price_cup: f64) -> Self {
        Self {
            name: name.into(),
            price_usd,
            price_cup,
        }
    }

    /// A record is worth listing when it has a name and some price.
    pub fn is_listable(&self) -> bool {
        !self.name.is_empty() && (self.price_usd > 0.0 || self.price_cup > 0.0)
    }
}

/// An immutable, sorted, deduplicated set of products.
///
/// Replaced wholesale on reload; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<ProductRecord>,
    last_loaded_at: Option<SystemTime>,
}

impl Catalog {
    /// Build a snapshot from already-normalized records.
    pub fn new(products: Vec<ProductRecord>, last_loaded_at: SystemTime) -> Self {
        Self {
            products,
            last_loaded_at: Some(last_loaded_at),
        }
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Modification marker of the file this snapshot was read from.
    /// `None` until the first successful load.
    pub fn last_loaded_at(&self) -> Option<SystemTime> {
        self.last_loaded_at
    }

    /// Records whose name contains `needle`, in catalog order, capped at `limit`.
    ///
    /// `needle` must already be normalized.
    pub fn matching(&self, needle: &str, limit: usize) -> Vec<ProductRecord> {
        self.products
            .iter()
            .filter(|p| p.name.contains(needle))
            .take(limit)
            .cloned()
            .collect()
    }
}
