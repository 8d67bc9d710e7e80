use super::base::{SinkMode, StorageBackend, StorageError};
use crate::parser::ProductRecord;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// In-memory sink following the same resume policy as the CSV sink. Clones share rows.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    mode: SinkMode,
    rows: Arc<Mutex<Vec<ProductRecord>>>,
    initialized: bool,
}

impl MemoryStorage {
    pub fn new(mode: SinkMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> Vec<ProductRecord> {
        self.rows.lock().clone()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn initialize(&mut self, resume: bool) -> Result<(), StorageError> {
        if !resume || self.mode == SinkMode::Truncate {
            self.rows.lock().clear();
        }
        self.initialized = true;
        Ok(())
    }

    async fn store(&mut self, record: &ProductRecord) -> Result<(), StorageError> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }
        self.rows.lock().push(record.clone());
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}
