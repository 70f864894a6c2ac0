use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid date range: start {start} must fall before end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Degenerate triangle: zero development base at transition {transition}")]
    DegenerateTriangle { transition: usize },

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FinCalcError {
    fn from(e: serde_json::Error) -> Self {
        FinCalcError::SerializationError(e.to_string())
    }
}
