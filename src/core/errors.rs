use crate::storage::base::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Fetch failed for {url}: {reason}")]
    FetchError { url: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON-LD decode error: {0}")]
    DecodeError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl ScraperError {
    pub fn config(msg: impl Into<String>) -> Self {
        ScraperError::ConfigError(msg.into())
    }
}

pub type ScraperResult<T> = Result<T, ScraperError>;
