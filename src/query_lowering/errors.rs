//! Error types for lowering builder queries into the IR.
//!
//! Every failure is detected while walking the query, before any text is printed.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoweringError {
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    #[error("Invalid table reference: {0}")]
    InvalidTableReference(String),

    #[error("Parameter `${name}` is bound to two different values (rename one of the variables)")]
    ConflictingParameter { name: String },

    #[error("Invalid parameter name `{name}` (names must be identifiers: letters, digits and `_`)")]
    InvalidParameterName { name: String },
}

impl LoweringError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        LoweringError::UnsupportedOperation(message.into())
    }

    pub fn projection(message: impl Into<String>) -> Self {
        LoweringError::InvalidProjection(message.into())
    }
}
