//! Raw tabular rows and the normalization pass that turns them into products.
//!
//! # Responsibilities
//! - Map sheet columns to name / USD / CUP (by header, or by position)
//! - Normalize names (trim + uppercase), drop blanks, keep first duplicate
//! - Coerce prices to non-negative numbers, invalid or missing → 0
//! - Drop rows without any price, sort by name

use std::collections::HashSet;

use crate::catalog::record::ProductRecord;
use crate::catalog::source::SourceError;

/// Header that identifies a labelled sheet. Matched case-sensitively.
pub const NAME_COLUMN: &str = "Producto";
pub const USD_COLUMN: &str = "USD";
pub const CUP_COLUMN: &str = "CUP";

/// A single spreadsheet cell, reduced to what normalization cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    fn as_name(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    fn as_price(&self) -> f64 {
        let value = match self {
            Cell::Empty => return 0.0,
            Cell::Number(n) => *n,
            Cell::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => n,
                Err(_) => return 0.0,
            },
        };
        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// Header row plus data rows, exactly as read from the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    name: usize,
    usd: usize,
    cup: usize,
}

fn resolve_columns(headers: &[String]) -> Result<ColumnMap, SourceError> {
    let position = |label: &'static str| {
        headers
            .iter()
            .position(|h| h == label)
            .ok_or(SourceError::MissingColumn(label))
    };

    if headers.iter().any(|h| h == NAME_COLUMN) {
        return Ok(ColumnMap {
            name: position(NAME_COLUMN)?,
            usd: position(USD_COLUMN)?,
            cup: position(CUP_COLUMN)?,
        });
    }

    if headers.len() < 3 {
        return Err(SourceError::TooFewColumns(headers.len()));
    }

    tracing::info!(columns = ?headers, "No Producto header, mapping first three columns by position");
    Ok(ColumnMap { name: 0, usd: 1, cup: 2 })
}

/// Trim and uppercase a product name or search query.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Turn raw rows into the sorted, deduplicated product list.
pub fn normalize(table: &RawTable) -> Result<Vec<ProductRecord>, SourceError> {
    let columns = resolve_columns(&table.headers)?;
    let cell = |row: &[Cell], idx: usize| row.get(idx).cloned().unwrap_or(Cell::Empty);

    let mut seen = HashSet::new();
    let mut products = Vec::with_capacity(table.rows.len());

    for row in &table.rows {
        let row = row.as_slice();
        let Some(raw_name) = cell(row, columns.name).as_name() else {
            continue;
        };
        let name = normalize_name(&raw_name);
        if name.is_empty() || !seen.insert(name.clone()) {
            continue;
        }

        let record = ProductRecord::new(
            name,
            cell(row, columns.usd).as_price(),
            cell(row, columns.cup).as_price(),
        );
        if record.is_listable() {
            products.push(record);
        }
    }

    products.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(products)
}
