// ==========================================
// Rental Ledger - Import Error Types
// ==========================================
// Batch-fatal failures only. Row-level problems are not errors of
// this type; they are recorded per row and the batch continues.
// ==========================================

use crate::domain::types::Platform;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    // ===== Upload validation =====
    #[error("unsupported file type: {0} (only .csv is accepted)")]
    UnsupportedFileType(String),

    #[error("file too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: usize, limit: usize },

    #[error("file contains no data rows")]
    EmptyFile,

    #[error("too many rows: {rows} (limit {limit})")]
    TooManyRows { rows: usize, limit: usize },

    // ===== Structural validation =====
    #[error("could not locate check-in/check-out columns for {platform:?}; headers: {headers:?}")]
    MissingDateColumns {
        platform: Platform,
        headers: Vec<String>,
    },

    // ===== Collaborators =====
    #[error("storage failure: {0}")]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for the import layer.
pub type ImportResult<T> = Result<T, ImportError>;
