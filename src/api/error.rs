// ==========================================
// Rental Ledger - API Error Types
// ==========================================
// Outer-surface errors with an HTTP-shaped status and a JSON
// envelope. Batch-fatal import errors map onto these; row-level
// problems never surface here (they ride inside the results).
// ==========================================

use crate::domain::types::Platform;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorStatus {
    BadRequest,
    NotFound,
    RateLimited,
    Internal,
}

impl ErrorStatus {
    pub fn code(&self) -> u16 {
        match self {
            ErrorStatus::BadRequest => 400,
            ErrorStatus::NotFound => 404,
            ErrorStatus::RateLimited => 429,
            ErrorStatus::Internal => 500,
        }
    }
}

// ==========================================
// ErrorEnvelope - serialized error payload
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    /// Extra response headers, e.g. Retry-After on rate limits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Platform detected before the failure, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: ErrorStatus,
    pub message: String,
    pub headers: Option<HashMap<String, String>>,
    pub platform: Option<Platform>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: ErrorStatus::BadRequest,
            message: message.into(),
            headers: None,
            platform: None,
        }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after_secs: u64) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Retry-After".to_string(), retry_after_secs.to_string());
        Self {
            status: ErrorStatus::RateLimited,
            message: message.into(),
            headers: Some(headers),
            platform: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: ErrorStatus::Internal,
            message: message.into(),
            headers: None,
            platform: None,
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.message.clone(),
            headers: self.headers.clone(),
            platform: self.platform,
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match &err {
            ImportError::UnsupportedFileType(_)
            | ImportError::FileTooLarge { .. }
            | ImportError::EmptyFile
            | ImportError::TooManyRows { .. } => ApiError::bad_request(err.to_string()),
            ImportError::MissingDateColumns { platform, .. } => {
                let platform = *platform;
                ApiError::bad_request(err.to_string()).with_platform(platform)
            }
            ImportError::Repository(_) | ImportError::Other(_) => {
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        ApiError::internal(err.to_string())
    }
}

/// Result type alias for the API layer.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorStatus::BadRequest.code(), 400);
        assert_eq!(ErrorStatus::RateLimited.code(), 429);
        assert_eq!(ErrorStatus::Internal.code(), 500);
    }

    #[test]
    fn test_rate_limited_carries_retry_after() {
        let err = ApiError::rate_limited("slow down", 3600);
        let headers = err.headers.unwrap();
        assert_eq!(headers.get("Retry-After").map(String::as_str), Some("3600"));
    }

    #[test]
    fn test_import_error_mapping() {
        let err: ApiError = ImportError::EmptyFile.into();
        assert_eq!(err.status, ErrorStatus::BadRequest);

        let err: ApiError = ImportError::MissingDateColumns {
            platform: Platform::Booking,
            headers: vec!["x".into()],
        }
        .into();
        assert_eq!(err.status, ErrorStatus::BadRequest);
        assert_eq!(err.platform, Some(Platform::Booking));
    }
}
