use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Enrichment attempt failures
    #[error("Enrichment error: {0}")]
    Enrichment(String),

    /// Persistence errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Enrichment(_) => "ENRICHMENT_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Timeout(_) => "TIMEOUT",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error marks a failed enrichment attempt rather than a
    /// missing entity or bad input
    pub fn is_enrichment_failure(&self) -> bool {
        !matches!(self, AppError::NotFound(_) | AppError::Validation(_))
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::NotFound("test".to_string()).error_code(),
            "NOT_FOUND"
        );
        assert_eq!(
            AppError::Validation("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::Enrichment("test".to_string()).error_code(),
            "ENRICHMENT_ERROR"
        );
        assert_eq!(
            AppError::Storage("test".to_string()).error_code(),
            "STORAGE_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Enrichment("categorization unavailable".to_string());
        assert_eq!(
            err.to_string(),
            "Enrichment error: categorization unavailable"
        );
    }

    #[test]
    fn test_failure_classification() {
        assert!(AppError::Enrichment("x".to_string()).is_enrichment_failure());
        assert!(AppError::Storage("x".to_string()).is_enrichment_failure());
        assert!(AppError::Timeout("x".to_string()).is_enrichment_failure());
        assert!(!AppError::NotFound("x".to_string()).is_enrichment_failure());
        assert!(!AppError::Validation("x".to_string()).is_enrichment_failure());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
        let err: AppError = json_err.into();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
