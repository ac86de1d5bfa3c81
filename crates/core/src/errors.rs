//! Core error types for the Tradefolio engine.
//!
//! The derivation engine is pure: it either returns a complete result or fails fast on a
//! precondition violation. Degenerate numeric cases (no sign change for XIRR, zero cash
//! invested) are not errors and never surface here.

use chrono::ParseError as ChronoParseError;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::records::RecordKind;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Portfolio calculation failed: {0}")]
    Calculation(#[from] CalculatorError),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

impl Error {
    pub fn record_not_found(kind: RecordKind, id: &str) -> Self {
        Error::NotFound(format!("{} record '{}'", kind.as_str(), id))
    }

    pub fn duplicate_record(kind: RecordKind, id: &str) -> Self {
        Error::ConstraintViolation(format!(
            "{} record '{}' already exists",
            kind.as_str(),
            id
        ))
    }
}

/// Errors raised while deriving portfolio state.
#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Invalid activity data: {0}")]
    InvalidActivity(String),

    #[error("Calculation failed: {0}")]
    Calculation(String),

    #[error("Recompute worker is not running")]
    WorkerUnavailable,
}

/// Precondition violations on incoming records. These indicate an upstream validation bug.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Trade execution {id} has zero quantity")]
    ZeroQuantity { id: String },

    #[error("Record {id} has non-positive price {price}")]
    NonPositivePrice { id: String, price: Decimal },

    #[error("Trade execution {id} has negative handling fee {fee}")]
    NegativeFee { id: String, fee: Decimal },

    #[error("Handling fee discount {id} has negative amount {amount}")]
    NegativeDiscount { id: String, amount: Decimal },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}
