use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    NotFound(String),
    ValidationError(String),
    NetworkError(String),
    DataProcessingError(String),
    FileError(String),
}

impl AppError {
    /// Stable machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Internal(_) => "UNKNOWN_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NetworkError(_) => "NETWORK_ERROR",
            AppError::DataProcessingError(_) => "DATA_PROCESSING_ERROR",
            AppError::FileError(_) => "FILE_ERROR",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Internal(_) => 500,
            AppError::NotFound(_) => 404,
            AppError::ValidationError(_) => 400,
            AppError::NetworkError(_) => 503,
            AppError::DataProcessingError(_) => 422,
            AppError::FileError(_) => 400,
        }
    }

    /// Operational errors are expected and recoverable by the user (retry,
    /// upload another file). Only the catch-all is not.
    pub fn is_operational(&self) -> bool {
        !matches!(self, AppError::Internal(_))
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Internal(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg)
            | AppError::NetworkError(msg)
            | AppError::DataProcessingError(msg)
            | AppError::FileError(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            AppError::DataProcessingError(msg) => write!(f, "Data processing error: {}", msg),
            AppError::FileError(msg) => write!(f, "File error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileError(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_error_kind() {
        assert_eq!(AppError::ValidationError("x".into()).status_code(), 400);
        assert_eq!(AppError::NetworkError("x".into()).status_code(), 503);
        assert_eq!(AppError::DataProcessingError("x".into()).status_code(), 422);
        assert_eq!(AppError::FileError("x".into()).status_code(), 400);
        assert_eq!(AppError::NotFound("x".into()).status_code(), 404);
        assert_eq!(AppError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn test_only_internal_is_non_operational() {
        assert!(AppError::NetworkError("down".into()).is_operational());
        assert!(AppError::FileError("missing".into()).is_operational());
        assert!(!AppError::Internal("boom".into()).is_operational());
    }

    #[test]
    fn test_io_error_maps_to_file_error() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.code(), "FILE_ERROR");
        assert_eq!(err.message(), "gone");
    }
}
