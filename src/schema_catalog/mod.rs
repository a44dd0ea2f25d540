//! Record schemas: which members a record type has and where they are stored.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod record;
pub mod record_schema;

pub use catalog::{CatalogId, SchemaCatalog, SchemaProvider};
pub use config::SchemaConfig;
pub use errors::SchemaError;
pub use record::{schema_of, Record};
pub use record_schema::{FieldSchema, RecordSchema};
