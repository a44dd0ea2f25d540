//! Intermediate representation of SurrealQL.
//!
//! A closed node set mirroring the destination grammar. The lowering pass builds
//! these nodes and the generator prints them; nothing mutates a tree once it has
//! been handed to the printer.

pub mod idiom;
pub mod operator;
pub mod statement;
pub mod value;

pub use idiom::{Idiom, Part};
pub use operator::{BindingPower, Distance, Operator};
pub use statement::{Direction, Explain, Field, Fields, Group, Order, SelectStatement, With};
pub use value::{
    Cast, Constant, Coordinate, Expression, Function, Geometry, IfElse, Kind, Number, Range,
    RecordId, RecordKey, Value,
};
