//! Integration seam for sealed blocks
//!
//! A sink is told about each block after it has been appended in memory.
//! Storage and transport live behind this trait, outside the ledger.

use crate::{BlockRecord, SinkError};
use std::sync::Mutex;

/// Receiver of newly sealed blocks
pub trait BlockSink: Send + Sync {
    /// Take one exported block
    fn record(&self, block: &BlockRecord) -> Result<(), SinkError>;
}

/// Sink that keeps every record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<BlockRecord>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far
    pub fn records(&self) -> Vec<BlockRecord> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of records received
    pub fn len(&self) -> usize {
        match self.records.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether nothing has been received
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlockSink for MemorySink {
    fn record(&self, block: &BlockRecord) -> Result<(), SinkError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;
        records.push(block.clone());
        Ok(())
    }
}
