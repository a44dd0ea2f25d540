use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::errors::SchemaError;
use super::record::{schema_of, Record};
use super::record_schema::RecordSchema;
use crate::query_builder::Query;

static NEXT_CATALOG_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`SchemaCatalog`]. Queries built from a catalog carry it so they can only
/// be translated against the catalog that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CatalogId(u64);

impl CatalogId {
    fn next() -> Self {
        CatalogId(NEXT_CATALOG_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Source of table schemas for the lowering pass.
pub trait SchemaProvider {
    fn schema(&self, table: &str) -> Option<Arc<RecordSchema>>;

    /// Identity checked against the root of every translated query. Providers without
    /// an identity accept any root.
    fn catalog_id(&self) -> Option<CatalogId> {
        None
    }
}

/// Registered record schemas, keyed by table name.
#[derive(Debug)]
pub struct SchemaCatalog {
    id: CatalogId,
    tables: HashMap<String, Arc<RecordSchema>>,
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self {
            id: CatalogId::next(),
            tables: HashMap::new(),
        }
    }

    pub fn id(&self) -> CatalogId {
        self.id
    }

    /// Register the record type `T`. Registering the same type twice is a no-op.
    pub fn register<T: Record>(&mut self) -> Result<&mut Self, SchemaError> {
        let schema = schema_of::<T>()?;
        self.insert(schema)?;
        Ok(self)
    }

    pub fn register_schema(&mut self, schema: RecordSchema) -> Result<&mut Self, SchemaError> {
        self.insert(Arc::new(schema))?;
        Ok(self)
    }

    fn insert(&mut self, schema: Arc<RecordSchema>) -> Result<(), SchemaError> {
        match self.tables.get(&schema.table) {
            Some(existing) if Arc::ptr_eq(existing, &schema) || **existing == *schema => Ok(()),
            Some(_) => Err(SchemaError::DuplicateTable {
                table: schema.table.clone(),
            }),
            None => {
                log::debug!("Registered table `{}`", schema.table);
                self.tables.insert(schema.table.clone(), schema);
                Ok(())
            }
        }
    }

    pub fn get(&self, table: &str) -> Option<Arc<RecordSchema>> {
        self.tables.get(table).cloned()
    }

    /// Registered table names, sorted.
    pub fn tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Checks that every nested record member points at a registered table.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for name in self.tables() {
            let schema = &self.tables[name];
            for field in schema.all_fields() {
                if let Some(record) = &field.record {
                    if !self.tables.contains_key(record) {
                        return Err(SchemaError::UnknownRecordReference {
                            table: schema.table.clone(),
                            property: field.property.clone(),
                            record: record.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Start a query over the table of `T`, bound to this catalog.
    pub fn query<T: Record>(&self) -> Query {
        Query::bound(T::table(), self.id)
    }

    /// Start a query over a table by name, bound to this catalog.
    pub fn query_table(&self, table: impl Into<String>) -> Query {
        Query::bound(table, self.id)
    }
}

impl SchemaProvider for SchemaCatalog {
    fn schema(&self, table: &str) -> Option<Arc<RecordSchema>> {
        self.get(table)
    }

    fn catalog_id(&self) -> Option<CatalogId> {
        Some(self.id)
    }
}
