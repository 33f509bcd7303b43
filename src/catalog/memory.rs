//! In-memory price source.
//!
//! Test double for driving reloads without touching the filesystem. Every
//! mutation advances the modification marker by one second.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use crate::catalog::source::{SourceError, TableSource};
use crate::catalog::table::RawTable;

#[derive(Debug)]
struct MemoryState {
    table: RawTable,
    marker: SystemTime,
    fail_reads: bool,
    reads: usize,
}

/// A cloneable handle to a shared in-memory table.
#[derive(Debug, Clone)]
pub struct MemorySource {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySource {
    pub fn new(table: RawTable) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                table,
                marker: SystemTime::UNIX_EPOCH + Duration::from_secs(1),
                fail_reads: false,
                reads: 0,
            })),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Swap the table contents and advance the marker.
    pub fn replace(&self, table: RawTable) {
        self.with(|s| {
            s.table = table;
            s.marker += Duration::from_secs(1);
        });
    }

    /// Advance the marker without changing contents.
    pub fn touch(&self) {
        self.with(|s| s.marker += Duration::from_secs(1));
    }

    /// Make subsequent reads fail, as an unreadable file would.
    pub fn fail_reads(&self, fail: bool) {
        self.with(|s| s.fail_reads = fail);
    }

    /// Number of full reads performed so far.
    pub fn reads(&self) -> usize {
        self.with(|s| s.reads)
    }
}

impl TableSource for MemorySource {
    fn marker(&self) -> Result<SystemTime, SourceError> {
        Ok(self.with(|s| s.marker))
    }

    fn read(&self) -> Result<RawTable, SourceError> {
        self.with(|s| {
            s.reads += 1;
            if s.fail_reads {
                Err(SourceError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "simulated read failure",
                )))
            } else {
                Ok(s.table.clone())
            }
        })
    }

    fn ensure_exists(&self) -> Result<bool, SourceError> {
        Ok(false)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
