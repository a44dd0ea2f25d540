//! SurQL Translate - query builder to SurrealQL translation
//!
//! This crate turns queries composed through a typed builder into SurrealQL text plus the
//! parameters the text references:
//! - Record schemas declared per type or loaded from YAML
//! - A builder AST for filter, projection, ordering, grouping, pagination and aggregates
//! - Lowering into an IR that mirrors the SurrealQL grammar
//! - Precedence-aware SurrealQL generation

pub mod config;
pub mod query_builder;
pub mod query_lowering;
pub mod schema_catalog;
pub mod surql_generator;
pub mod surql_ir;
pub mod translator;

pub use config::TranslatorConfig;
pub use query_builder::{Expr, Literal, Query};
pub use schema_catalog::{Record, SchemaCatalog, SchemaProvider};
pub use translator::{translate, translate_with_config, TranslateError, Translation, Translator};
