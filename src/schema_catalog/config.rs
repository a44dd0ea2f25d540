//! YAML schema files.
//!
//! ```yaml
//! tables:
//!   - name: post
//!     fields:
//!       - property: Id
//!         column: id
//!       - property: Title
//!         column: title
//!       - property: Secret
//!         writable: false
//!   - name: order
//!     fields:
//!       - property: Address
//!         record: address
//! ```
//!
//! `column` defaults to the property name; `readable` and `writable` default to `true`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::catalog::SchemaCatalog;
use super::errors::SchemaError;
use super::record_schema::{FieldSchema, RecordSchema};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub tables: Vec<TableDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub property: String,
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default = "default_true")]
    pub readable: bool,
    #[serde(default = "default_true")]
    pub writable: bool,
    /// Table of the nested record type
    #[serde(default)]
    pub record: Option<String>,
}

impl From<&FieldDefinition> for FieldSchema {
    fn from(def: &FieldDefinition) -> Self {
        FieldSchema {
            property: def.property.clone(),
            column: def.column.clone().unwrap_or_else(|| def.property.clone()),
            readable: def.readable,
            writable: def.writable,
            record: def.record.clone(),
        }
    }
}

impl SchemaConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path).map_err(|e| SchemaError::ConfigReadError {
            error: e.to_string(),
        })?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        serde_yaml::from_str(yaml).map_err(|e| SchemaError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Checks table and property uniqueness and that nested record members resolve.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.tables.is_empty() {
            return Err(SchemaError::InvalidConfig {
                message: "Schema must declare at least one table".to_string(),
            });
        }

        let mut seen_tables = HashSet::new();
        for table in &self.tables {
            if table.name.is_empty() {
                return Err(SchemaError::InvalidConfig {
                    message: "Table names must not be empty".to_string(),
                });
            }
            if !seen_tables.insert(table.name.as_str()) {
                return Err(SchemaError::DuplicateTable {
                    table: table.name.clone(),
                });
            }
        }

        for table in &self.tables {
            let mut seen_fields = HashSet::new();
            for field in &table.fields {
                if !seen_fields.insert(field.property.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        table: table.name.clone(),
                        property: field.property.clone(),
                    });
                }
                if let Some(record) = &field.record {
                    if !seen_tables.contains(record.as_str()) {
                        return Err(SchemaError::UnknownRecordReference {
                            table: table.name.clone(),
                            property: field.property.clone(),
                            record: record.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate and build a catalog holding every declared table.
    pub fn to_catalog(&self) -> Result<SchemaCatalog, SchemaError> {
        self.validate()?;

        let mut catalog = SchemaCatalog::new();
        for table in &self.tables {
            let fields = table.fields.iter().map(FieldSchema::from).collect();
            catalog.register_schema(RecordSchema::new(table.name.clone(), fields)?)?;
        }
        log::info!("Loaded schema with {} tables", self.tables.len());
        Ok(catalog)
    }
}
