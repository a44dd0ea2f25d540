use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SurqlGeneratorError {
    #[error("SELECT has no fields (projection must contain at least one expression)")]
    EmptyProjection,
    #[error("SELECT VALUE takes exactly one expression, found {0}")]
    InvalidValueProjection(usize),
    #[error("SELECT has no source (FROM must name a table, value or subquery)")]
    MissingSource,
    #[error("IF expression has no branches (at least one condition is required)")]
    EmptyConditional,
    #[error("Empty identifier (table, field, alias and parameter names must not be empty)")]
    EmptyIdentifier,
    #[error("Empty field path (an idiom needs at least one part)")]
    EmptyIdiom,
}
