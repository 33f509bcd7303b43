//! Product catalog subsystem.
//!
//! # Data Flow
//! ```text
//! price sheet (.xlsx)
//!     → xlsx.rs (TableSource: marker + raw rows)
//!     → table.rs (column mapping, normalization)
//!     → store.rs (atomic swap of Arc<Catalog>)
//!     → search / poll loops observe the new snapshot
//! ```

pub mod history;
#[cfg(test)]
pub(crate) mod memory;
pub mod record;
pub mod source;
pub mod store;
pub mod table;
pub mod xlsx;

pub use history::load_history;
pub use record::{Catalog, ProductRecord};
pub use source::{SourceError, TableSource};
pub use store::CatalogStore;
pub use table::{normalize, Cell, RawTable};
pub use xlsx::XlsxSource;
