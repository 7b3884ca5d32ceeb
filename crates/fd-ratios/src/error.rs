//! Error types for ratio computations.

use thiserror::Error;

/// Result type for ratio operations.
pub type Result<T> = std::result::Result<T, RatioError>;

/// Errors that can occur during ratio computation.
///
/// Arithmetic anomalies such as division by zero are never reported here; they
/// resolve to a missing value at the affected index.
#[derive(Debug, Error)]
pub enum RatioError {
    /// Required field absent from the input table
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Insufficient history for a windowed computation
    #[error("Insufficient data: need {required} periods, got {available}")]
    InsufficientData {
        /// Required number of periods
        required: usize,
        /// Available number of periods
        available: usize,
    },

    /// Invalid call parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Timestamps and values of different lengths
    #[error("Length mismatch: {dates} dates but {values} values")]
    LengthMismatch {
        /// Number of timestamps supplied
        dates: usize,
        /// Number of values supplied
        values: usize,
    },

    /// Unparseable date in the input data
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Ratio not found in registry
    #[error("Ratio not found: {0}")]
    NotFound(String),
}

impl RatioError {
    /// Name of the missing field, if this is a [`RatioError::MissingField`].
    pub fn missing_field(&self) -> Option<&str> {
        match self {
            Self::MissingField(field) => Some(field),
            _ => None,
        }
    }
}
