//! `.xlsx` price sheet source.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;

use crate::catalog::source::{SourceError, TableSource};
use crate::catalog::table::{Cell, RawTable, CUP_COLUMN, NAME_COLUMN, USD_COLUMN};

/// Rows written when the sheet does not exist yet.
pub const SAMPLE_ROWS: [(&str, f64, f64); 3] = [
    ("VINO TINTO RESERVA", 15.99, 380.00),
    ("VINO BLANCO CHARDONNAY", 18.75, 446.25),
    ("WHISKY ESCOCÉS", 32.50, 773.75),
];

/// Reads the first worksheet of a workbook; the first row holds headers.
#[derive(Debug, Clone)]
pub struct XlsxSource {
    path: PathBuf,
}

impl XlsxSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSource for XlsxSource {
    fn marker(&self) -> Result<SystemTime, SourceError> {
        Ok(std::fs::metadata(&self.path)?.modified()?)
    }

    fn read(&self) -> Result<RawTable, SourceError> {
        let mut workbook = open_workbook_auto(&self.path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(SourceError::NoWorksheet)??;

        let mut rows = range.rows();
        let headers = match rows.next() {
            Some(header_row) => header_row.iter().map(header_text).collect(),
            None => Vec::new(),
        };
        let rows = rows.map(|row| row.iter().map(to_cell).collect()).collect();

        Ok(RawTable::new(headers, rows))
    }

    fn ensure_exists(&self) -> Result<bool, SourceError> {
        if self.path.exists() {
            return Ok(false);
        }

        tracing::info!(path = ?self.path, "Price sheet missing, writing sample data");
        write_sheet(&self.path, &SAMPLE_ROWS)?;
        Ok(true)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write a labelled price sheet, creating parent directories as needed.
pub fn write_sheet(path: &Path, rows: &[(&str, f64, f64)]) -> Result<(), SourceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, NAME_COLUMN)?;
    sheet.write_string(0, 1, USD_COLUMN)?;
    sheet.write_string(0, 2, CUP_COLUMN)?;

    for (i, (name, usd, cup)) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *name)?;
        sheet.write_number(row, 1, *usd)?;
        sheet.write_number(row, 2, *cup)?;
    }

    workbook.save(path)?;
    Ok(())
}

fn header_text(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Float(n) => Cell::Number(*n),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::Error(_) => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}
