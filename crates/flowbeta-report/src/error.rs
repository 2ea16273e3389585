//! Report error types.

use flowbeta_types::FlowError;
use thiserror::Error;

/// Errors that can occur while exporting profiles and charts.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The drawing backend failed.
    #[error("Chart error: {0}")]
    Draw(String),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ReportError> for FlowError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Io(e) => Self::Io(e),
            other => Self::Format(other.to_string()),
        }
    }
}
