//! Error types for flowbeta.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Result type alias for flowbeta operations.
pub type Result<T> = std::result::Result<T, FlowError>;

/// Errors that can occur while loading ticks and deriving signals.
#[derive(Error, Debug)]
pub enum FlowError {
    /// I/O error, including a missing daily source file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed record in a source file.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// Index or shape mismatch inside a single day's computation.
    #[error("Alignment error: {0}")]
    Alignment(String),

    /// A regression window has fewer rows than model parameters.
    #[error("Insufficient data in window {window}: {rows} rows for {params} parameters")]
    InsufficientWindowData {
        /// Start of the offending window.
        window: DateTime<Utc>,
        /// Number of observations in the window.
        rows: usize,
        /// Number of parameters the model needs.
        params: usize,
    },

    /// The requested predictor is not part of a fitted model.
    #[error("Predictor '{0}' is not among the fitted parameters")]
    MissingPredictor(String),

    /// The beta series and the depth grid disagree on window count.
    #[error("Cardinality mismatch: {betas} beta windows for {grid} grid slots")]
    CardinalityMismatch {
        /// Number of beta values.
        betas: usize,
        /// Number of slots on the depth grid.
        grid: usize,
    },

    /// Numerical failure while fitting a regression window.
    #[error("Numerical error: {0}")]
    Numeric(String),

    /// Output format error.
    #[error("Format error: {0}")]
    Format(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FlowError {
    /// Returns true for index/alignment failures, which the multi-day
    /// assembler reports separately from every other failure.
    #[must_use]
    pub const fn is_alignment(&self) -> bool {
        matches!(self, Self::Alignment(_))
    }
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// A date string is not in `YYYY-MM-DD` form.
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_alignment_classification() {
        assert!(FlowError::Alignment("empty".into()).is_alignment());
        assert!(!FlowError::Parse("bad".into()).is_alignment());
    }

    #[test]
    fn test_insufficient_window_message() {
        let window = Utc.with_ymd_and_hms(2020, 11, 15, 10, 30, 0).unwrap();
        let err = FlowError::InsufficientWindowData {
            window,
            rows: 1,
            params: 2,
        };
        assert!(err.to_string().contains("1 rows for 2 parameters"));
    }
}
