//! Query translation entry points.
//!
//! A [`Translator`] turns a builder [`Query`] into SurrealQL text and the parameters the
//! text references:
//!
//! ```
//! use surql_translate::query_builder::Query;
//! use surql_translate::schema_catalog::{FieldSchema, RecordSchema, SchemaCatalog};
//! use surql_translate::translator::Translator;
//!
//! let mut catalog = SchemaCatalog::new();
//! catalog
//!     .register_schema(
//!         RecordSchema::new(
//!             "user",
//!             vec![FieldSchema::id(), FieldSchema::new("Username"), FieldSchema::new("Age")],
//!         )
//!         .unwrap(),
//!     )
//!     .unwrap();
//!
//! let query = Query::from_table("user")
//!     .filter(|u| u.member("Age").ge(surql_translate::query_builder::Expr::var("minAge", 18)))
//!     .select(|u| u.member("Username"));
//!
//! let translation = Translator::new(&catalog).translate(&query).unwrap();
//! assert_eq!(translation.query, "SELECT VALUE Username FROM user WHERE Age >= $minAge");
//! assert_eq!(translation.parameters.names().collect::<Vec<_>>(), vec!["minAge"]);
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::config::TranslatorConfig;
use crate::query_builder::Query;
use crate::query_lowering::{self, LoweringError, ParameterTable};
use crate::schema_catalog::{SchemaError, SchemaProvider};
use crate::surql_generator::{generate_query, SurqlGeneratorError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslateError {
    #[error(transparent)]
    Lowering(#[from] LoweringError),

    #[error(transparent)]
    Generation(#[from] SurqlGeneratorError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Query text plus the values of every `$name` it references.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub query: String,
    pub parameters: ParameterTable,
}

impl Translation {
    /// `{"query": ..., "parameters": {...}}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "query": self.query,
            "parameters": self.parameters.to_json(),
        })
    }
}

/// Translates queries against one schema provider.
pub struct Translator<'a> {
    provider: &'a dyn SchemaProvider,
    config: TranslatorConfig,
}

impl<'a> Translator<'a> {
    pub fn new(provider: &'a dyn SchemaProvider) -> Self {
        Self::with_config(provider, TranslatorConfig::default())
    }

    pub fn with_config(provider: &'a dyn SchemaProvider, config: TranslatorConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn translate(&self, query: &Query) -> Result<Translation, TranslateError> {
        translate_with_config(query, self.provider, &self.config)
    }
}

pub fn translate(query: &Query, provider: &dyn SchemaProvider) -> Result<Translation, TranslateError> {
    translate_with_config(query, provider, &TranslatorConfig::default())
}

pub fn translate_with_config(
    query: &Query,
    provider: &dyn SchemaProvider,
    config: &TranslatorConfig,
) -> Result<Translation, TranslateError> {
    let (value, parameters) = query_lowering::lower(query, provider, config)?;
    let text = generate_query(&value)?;

    log::debug!("Translated query over `{}`: {}", query.root.table, text);
    if !parameters.is_empty() {
        log::trace!(
            "Parameters: {}",
            parameters.names().collect::<Vec<_>>().join(", ")
        );
    }

    Ok(Translation {
        query: text,
        parameters,
    })
}
