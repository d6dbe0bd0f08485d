use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HousingFinanceError {
    #[error("Invalid term: {term_years} years (term must be a positive number of years)")]
    InvalidTerm { term_years: i64 },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Numeric overflow in {context} (value: {value})")]
    NumericOverflow { context: String, value: Decimal },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for HousingFinanceError {
    fn from(e: serde_json::Error) -> Self {
        HousingFinanceError::SerializationError(e.to_string())
    }
}
