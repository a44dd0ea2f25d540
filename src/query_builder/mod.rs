//! Query builder front-end.
//!
//! Callers compose a [`Query`] from a root table and a chain of operations. Lambdas are
//! built from closures over [`Expr`] handles, so the whole query is a plain value that can
//! be inspected, cloned or serialized before it is translated.

pub mod expr;
pub mod literal;
pub mod query;

pub use expr::{AggregateFn, BinaryOp, Expr, Lambda, UnaryOp};
pub use literal::Literal;
pub use query::{Query, QueryOp, QueryRoot};
