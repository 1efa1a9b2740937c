//! error.rs
//! Crate-wide error type. Every failure is synchronous and local to the call that raised it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QudtError {
    #[error("Dimension mismatch in {operation}: '{left}' is not convertible to '{right}'")]
    DimensionMismatch { operation: &'static str, left: String, right: String },
    #[error("Unknown unit symbol '{name}' in expression '{expression}'")]
    UnknownSymbol { name: String, expression: String },
    #[error("Malformed exponent '{exponent}' in expression '{expression}'")]
    MalformedExponent { exponent: String, expression: String },
    #[error("Malformed segment '{segment}' in expression '{expression}'")]
    MalformedSegment { segment: String, expression: String },
    #[error("Malformed quantity '{0}'")]
    MalformedQuantity(String),
    #[error("Malformed dimension code '{0}'")]
    MalformedDimensionCode(String),
    #[error("Invalid epsilon {0}: must lie strictly between 0 and 1")]
    InvalidEpsilon(f64),
    #[error("Cannot order {left} and {right}: a magnitude is NaN")]
    Unordered { left: String, right: String },
    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl QudtError {
    pub(crate) fn mismatch(operation: &'static str, left: impl ToString, right: impl ToString) -> Self {
        QudtError::DimensionMismatch { operation, left: left.to_string(), right: right.to_string() }
    }
}

impl From<serde_json::Error> for QudtError {
    fn from(e: serde_json::Error) -> Self {
        QudtError::Catalog(format!("invalid catalog JSON: {}", e))
    }
}

impl From<std::io::Error> for QudtError {
    fn from(e: std::io::Error) -> Self {
        QudtError::Catalog(format!("cannot read catalog: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, QudtError>;
