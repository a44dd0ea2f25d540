//! SurrealQL text generation from the IR.

pub mod errors;
pub mod escape;
pub mod literals;
pub mod to_surql;

pub use errors::SurqlGeneratorError;
pub use to_surql::ToSurql;

use crate::surql_ir::Value;

/// Prints a lowered query. A bare subquery at the top level is the statement itself,
/// so it is printed without the surrounding parentheses.
pub fn generate_query(value: &Value) -> Result<String, SurqlGeneratorError> {
    match value {
        Value::Subquery(statement) => statement.to_surql(),
        other => other.to_surql(),
    }
}
