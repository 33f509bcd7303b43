//! Backing data sources.
//!
//! The store only needs three things from wherever prices live: a cheap
//! modification marker, a full read of the raw table, and a way to seed
//! the source on first start. Polling the marker is the current change
//! detection strategy; an event-driven source can implement the same trait.

use std::time::SystemTime;

use crate::catalog::table::RawTable;

/// Errors raised while reading or seeding a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Spreadsheet read error: {0}")]
    Read(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("Workbook has no worksheets")]
    NoWorksheet,

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),

    #[error("Expected at least 3 columns, found {0}")]
    TooFewColumns(usize),
}

/// A tabular price source.
pub trait TableSource: Send + Sync + 'static {
    /// Modification marker; changes whenever the content may have changed.
    fn marker(&self) -> Result<SystemTime, SourceError>;

    /// Read the whole table.
    fn read(&self) -> Result<RawTable, SourceError>;

    /// Seed the source with sample data if it does not exist yet.
    /// Returns `true` when something was created.
    fn ensure_exists(&self) -> Result<bool, SourceError>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}
