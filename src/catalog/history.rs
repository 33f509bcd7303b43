//! Change history log.
//!
//! The history file is written by whoever edits the price sheet; the
//! service only hands it back verbatim.

use std::path::Path;

use serde_json::Value;

/// Read the history document, or an empty list when it is absent or unreadable.
pub fn load_history(path: &Path) -> Value {
    if !path.exists() {
        return Value::Array(Vec::new());
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<Value>(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(path = ?path, error = %e, "Could not read change history");
            Value::Array(Vec::new())
        }
    }
}
