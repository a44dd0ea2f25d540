//! # Schema Error Types
//!
//! Errors raised while declaring record schemas or loading them from YAML.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    #[error("Table `{table}` is declared more than once")]
    DuplicateTable { table: String },
    #[error("Property `{property}` is declared more than once on table `{table}`")]
    DuplicateField { table: String, property: String },
    #[error("Property `{property}` on table `{table}` references unknown record table `{record}`")]
    UnknownRecordReference {
        table: String,
        property: String,
        record: String,
    },
    #[error("Failed to read schema file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse schema: {error}")]
    ConfigParseError { error: String },
    #[error("Invalid schema: {message}")]
    InvalidConfig { message: String },
}

impl SchemaError {
    /// Create an InvalidConfig error naming the table it was found on
    pub fn invalid_config_with_context(
        message: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        SchemaError::InvalidConfig {
            message: format!("{}\n  Table: {}", message.into(), table.into()),
        }
    }
}
