use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::errors::SchemaError;

/// One member of a record type and the database field it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Member name used by the query builder
    pub property: String,
    /// Field name in the database document
    pub column: String,
    pub readable: bool,
    pub writable: bool,
    /// Table of the nested record type, when the member is itself a record
    pub record: Option<String>,
}

impl FieldSchema {
    /// A readable and writable member stored under its own name.
    pub fn new(property: impl Into<String>) -> Self {
        let property = property.into();
        Self {
            column: property.clone(),
            property,
            readable: true,
            writable: true,
            record: None,
        }
    }

    /// The record identifier, `Id` stored as `id`.
    pub fn id() -> Self {
        Self::new("Id").column("id")
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn record(mut self, table: impl Into<String>) -> Self {
        self.record = Some(table.into());
        self
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }

    /// Only members that round-trip (readable and writable) take part in queries.
    pub fn is_mapped(&self) -> bool {
        self.readable && self.writable
    }
}

/// Ordered field list of one record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub table: String,
    fields: Vec<FieldSchema>,
}

impl RecordSchema {
    pub fn new(table: impl Into<String>, fields: Vec<FieldSchema>) -> Result<Self, SchemaError> {
        let table = table.into();
        let mut seen = HashSet::new();
        for field in &fields {
            if field.property.is_empty() || field.column.is_empty() {
                return Err(SchemaError::invalid_config_with_context(
                    "property and column names must not be empty",
                    table.clone(),
                ));
            }
            if !seen.insert(field.property.as_str()) {
                return Err(SchemaError::DuplicateField {
                    table: table.clone(),
                    property: field.property.clone(),
                });
            }
        }
        Ok(Self { table, fields })
    }

    /// Every declared member, including unmapped ones.
    pub fn all_fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Members that take part in queries, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.is_mapped())
    }

    pub fn field(&self, property: &str) -> Option<&FieldSchema> {
        self.fields().find(|f| f.property == property)
    }

    /// Shape of the documents produced by a whole-record projection of this
    /// schema: every member now lives under its property name.
    pub fn projected(&self) -> RecordSchema {
        RecordSchema {
            table: self.table.clone(),
            fields: self
                .fields()
                .map(|f| FieldSchema {
                    column: f.property.clone(),
                    ..f.clone()
                })
                .collect(),
        }
    }
}
