use thiserror::Error;

use crate::core::import::ImportError;

/// Error type that captures persistence, import, and export failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
}
