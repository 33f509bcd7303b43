//! Catalog store with change detection.
//!
//! # Responsibilities
//! - Own the current catalog snapshot
//! - Detect source changes via the modification marker and reload
//! - Answer substring searches against the current snapshot
//!
//! # Design Decisions
//! - Snapshot lives in an `ArcSwap`: searches never block on a reload and
//!   always see either the old or the new catalog in full
//! - Reload checks are serialized by one mutex so a change is loaded once
//! - The marker is recorded before reading, so a broken sheet is reported
//!   once and retried only after it changes again
//! - Failures are logged and swallowed; the previous catalog keeps serving
//! - Every check seeds a missing source before looking at its marker

use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use arc_swap::ArcSwap;

use crate::catalog::record::{Catalog, ProductRecord};
use crate::catalog::source::TableSource;
use crate::catalog::table::{normalize, normalize_name};
use crate::observability::metrics;

/// Shared, hot-reloadable product catalog.
pub struct CatalogStore {
    source: Box<dyn TableSource>,
    catalog: ArcSwap<Catalog>,
    /// Marker of the last load attempt, successful or not.
    seen: Mutex<Option<SystemTime>>,
    default_limit: usize,
}

impl CatalogStore {
    /// Create a store with an empty catalog. Nothing is read yet.
    pub fn new(source: impl TableSource, default_limit: usize) -> Self {
        Self {
            source: Box::new(source),
            catalog: ArcSwap::from_pointee(Catalog::default()),
            seen: Mutex::new(None),
            default_limit,
        }
    }

    /// Create a store, seeding the source if needed and loading it once.
    pub fn open(source: impl TableSource, default_limit: usize) -> Self {
        let store = Self::new(source, default_limit);
        store.reload_if_changed();
        store
    }

    /// Reload the catalog if the source marker moved since the last attempt.
    ///
    /// A missing source is recreated from the sample data first, so a sheet
    /// deleted while running comes back on the next check.
    ///
    /// Returns `true` only when a new catalog was installed.
    pub fn reload_if_changed(&self) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);

        match self.source.ensure_exists() {
            Ok(true) => tracing::warn!(source = %self.source.describe(), "Price sheet missing, wrote sample data"),
            Ok(false) => {}
            Err(e) => {
                tracing::error!(source = %self.source.describe(), error = %e, "Failed to create sample price sheet")
            }
        }

        let marker = match self.source.marker() {
            Ok(marker) => marker,
            Err(e) => {
                tracing::error!(source = %self.source.describe(), error = %e, "Failed to stat price sheet");
                return false;
            }
        };

        if *seen == Some(marker) {
            return false;
        }
        *seen = Some(marker);

        tracing::info!(source = %self.source.describe(), "Price sheet changed, reloading");

        let loaded = self.source.read().and_then(|table| normalize(&table));
        match loaded {
            Ok(products) => {
                let count = products.len();
                self.catalog.store(Arc::new(Catalog::new(products, marker)));
                metrics::record_reload("loaded");
                metrics::record_catalog_size(count);
                tracing::info!(products = count, "Catalog loaded");
                true
            }
            Err(e) => {
                metrics::record_reload("failed");
                tracing::error!(
                    source = %self.source.describe(),
                    error = %e,
                    "Failed to load price sheet, keeping current catalog"
                );
                false
            }
        }
    }

    /// Products whose name contains `query` (case-insensitive), alphabetically,
    /// at most `limit` of them. A blank query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<ProductRecord> {
        let needle = normalize_name(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.catalog.load().matching(&needle, limit)
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.catalog.load_full()
    }

    /// Result cap used when callers do not pass one.
    pub fn default_limit(&self) -> usize {
        self.default_limit
    }
}
