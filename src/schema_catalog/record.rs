//! Per-type schema registration.
//!
//! A record type describes its table and members once through [`Record`]. The resulting
//! [`RecordSchema`] is computed on first use and shared through a process-wide cache keyed
//! by `TypeId`. Concurrent first uses may both compute the schema; the first one to publish
//! wins and every caller gets the same `Arc`.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use lazy_static::lazy_static;

use super::errors::SchemaError;
use super::record_schema::{FieldSchema, RecordSchema};

/// A record type stored in a table.
pub trait Record: 'static {
    /// Name of the table the records live in.
    fn table() -> &'static str;

    /// Members in declaration order.
    fn fields() -> Vec<FieldSchema>;
}

lazy_static! {
    static ref SCHEMA_CACHE: RwLock<HashMap<TypeId, Arc<RecordSchema>>> =
        RwLock::new(HashMap::new());
}

/// Resolve the cached schema of `T`.
pub fn schema_of<T: Record>() -> Result<Arc<RecordSchema>, SchemaError> {
    let key = TypeId::of::<T>();

    if let Some(schema) = SCHEMA_CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        return Ok(schema.clone());
    }

    let computed = Arc::new(RecordSchema::new(T::table(), T::fields())?);
    log::debug!(
        "Computed schema for table `{}` ({} fields)",
        computed.table,
        computed.all_fields().len()
    );

    let mut cache = SCHEMA_CACHE
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    Ok(cache.entry(key).or_insert(computed).clone())
}
