use crate::parser::ProductRecord;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage operation failed: {0}")]
    OperationError(String),
    #[error("Serialization failed: {0}")]
    SerializationError(String),
    #[error("Storage used before initialization")]
    NotInitialized,
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        StorageError::OperationError(error.to_string())
    }
}

impl From<csv::Error> for StorageError {
    fn from(error: csv::Error) -> Self {
        StorageError::SerializationError(error.to_string())
    }
}

/// What happens to rows of a previous run when a run resumes from a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkMode {
    /// Keep existing rows and append; a fresh run (checkpoint 0) still starts a new file.
    #[default]
    ResumeAppend,
    /// Always start a new file, discarding rows whose URLs will not be fetched again.
    Truncate,
}

/// Append target for extracted product rows.
#[async_trait]
pub trait StorageBackend: Send {
    /// Prepares the sink once per run. `resume` is true when the run starts past index 0.
    async fn initialize(&mut self, resume: bool) -> Result<(), StorageError>;

    async fn store(&mut self, record: &ProductRecord) -> Result<(), StorageError>;

    async fn flush(&mut self) -> Result<(), StorageError>;
}
