//! Error types for the forecasting core

use thiserror::Error;

/// Result type alias for forecasting operations
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Coarse classification of a failure, used by callers to pick a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or unknown column names, empty selector, empty dataset
    Configuration,
    /// A date or numeric column that is entirely unparsable
    Parsing,
    /// Model fitting and numeric failures
    Processing,
}

/// Main error type for the forecasting core
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Parsing error: {0}")]
    ParseError(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl ForecastError {
    /// Classify the error for the caller layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::ConfigError(_) | ForecastError::ColumnNotFound(_) => {
                ErrorKind::Configuration
            }
            ForecastError::ParseError(_)
            | ForecastError::DataError(_)
            | ForecastError::SerializationError(_) => ErrorKind::Parsing,
            ForecastError::ProcessingError(_)
            | ForecastError::ShapeError { .. }
            | ForecastError::ModelNotFitted
            | ForecastError::IoError(_) => ErrorKind::Processing,
        }
    }

    /// True for errors the caller caused (bad configuration or data).
    pub fn is_client_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Configuration | ErrorKind::Parsing)
    }
}

impl From<polars::error::PolarsError> for ForecastError {
    fn from(err: polars::error::PolarsError) -> Self {
        ForecastError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for ForecastError {
    fn from(err: ndarray::ShapeError) -> Self {
        ForecastError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
