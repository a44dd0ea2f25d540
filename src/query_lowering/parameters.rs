//! Bound parameters.
//!
//! Runtime values never appear in the query text. They are bound under a name and the
//! text refers to them as `$name`. The table keeps first-use order so identical builder
//! chains always produce identical parameter maps.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::errors::LoweringError;
use crate::config::{is_identifier, TranslatorConfig};
use crate::query_builder::Literal;
use crate::surql_ir::{Field, Group, Idiom, IfElse, Part, Range, SelectStatement, Value};

/// Ordered `name → value` map of every parameter referenced by a query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterTable(IndexMap<String, Literal>);

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Literal> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Literal)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Plain JSON object, in binding order.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    fn insert(&mut self, name: String, value: Literal) {
        self.0.insert(name, value);
    }

    /// Drops every entry whose name is not in `referenced`, keeping order.
    pub(crate) fn retain_referenced(&mut self, referenced: &HashSet<String>) {
        self.0.retain(|name, _| referenced.contains(name));
    }
}

/// Origin of generated record id names; never a valid identifier.
const RECORD_ID_ORIGIN: &str = "#record";

/// Hands out parameter names while a query is lowered.
pub struct ParameterBinder<'a> {
    config: &'a TranslatorConfig,
    table: ParameterTable,
    /// Bound name to the variable name that claimed it.
    origins: HashMap<String, String>,
    next_record_id: usize,
}

impl<'a> ParameterBinder<'a> {
    pub fn new(config: &'a TranslatorConfig) -> Self {
        Self {
            config,
            table: ParameterTable::new(),
            origins: HashMap::new(),
            next_record_id: 0,
        }
    }

    /// Binds a captured variable and returns the name to print after `$`.
    pub fn bind(&mut self, name: &str, value: Literal) -> Result<String, LoweringError> {
        if !is_identifier(name) {
            return Err(LoweringError::InvalidParameterName {
                name: name.to_string(),
            });
        }

        let config = self.config;
        let prefix = &config.reserved_prefix;
        let mut bound = if config.is_reserved(name) {
            format!("{}{}", prefix, name)
        } else {
            name.to_string()
        };

        // A name taken by a different variable (or a record id) moves further out
        loop {
            match self.origins.get(&bound) {
                Some(origin) if origin != name => bound = format!("{}{}", prefix, bound),
                Some(_) => {
                    return match self.table.get(&bound) {
                        Some(existing) if *existing == value => Ok(bound),
                        _ => Err(LoweringError::ConflictingParameter { name: bound }),
                    };
                }
                None => {
                    log::trace!("Binding parameter ${}", bound);
                    self.origins.insert(bound.clone(), name.to_string());
                    self.table.insert(bound.clone(), value);
                    return Ok(bound);
                }
            }
        }
    }

    /// Record ids are bound under generated names; the same id reuses its parameter.
    pub fn bind_record_id(&mut self, value: Literal) -> String {
        let config = self.config;
        let prefix = &config.record_id_parameter_prefix;
        if let Some((name, _)) = self
            .table
            .iter()
            .find(|(name, existing)| name.starts_with(prefix.as_str()) && **existing == value)
        {
            return name.to_string();
        }

        loop {
            let name = format!("{}{}", prefix, self.next_record_id);
            self.next_record_id += 1;
            if !self.table.contains(&name) {
                log::trace!("Binding record id as ${}", name);
                self.origins.insert(name.clone(), RECORD_ID_ORIGIN.to_string());
                self.table.insert(name.clone(), value);
                return name;
            }
        }
    }

    pub fn into_table(self) -> ParameterTable {
        self.table
    }
}

/// Collects the names of every `$param` reachable from `value`.
pub fn referenced_params(value: &Value, out: &mut HashSet<String>) {
    match value {
        Value::Param(name) => {
            out.insert(name.clone());
        }
        Value::Array(items) => items.iter().for_each(|v| referenced_params(v, out)),
        Value::Object(entries) => entries.values().for_each(|v| referenced_params(v, out)),
        Value::Idiom(idiom) => idiom_params(idiom, out),
        Value::Cast(cast) => referenced_params(&cast.value, out),
        Value::Function(f) => f.args.iter().for_each(|v| referenced_params(v, out)),
        Value::Subquery(statement) => statement_params(statement, out),
        Value::Expression(e) => match e.as_ref() {
            crate::surql_ir::Expression::Unary { v, .. } => referenced_params(v, out),
            crate::surql_ir::Expression::Binary { l, r, .. } => {
                referenced_params(l, out);
                referenced_params(r, out);
            }
        },
        Value::Range(range) => range_params(range, out),
        Value::IfElse(if_else) => if_else_params(if_else, out),
        _ => {}
    }
}

fn idiom_params(idiom: &Idiom, out: &mut HashSet<String>) {
    for part in idiom.parts() {
        match part {
            Part::Start(v) | Part::Where(v) | Part::Value(v) => referenced_params(v, out),
            Part::Method(_, args) => args.iter().for_each(|v| referenced_params(v, out)),
            _ => {}
        }
    }
}

fn range_params(range: &Range, out: &mut HashSet<String>) {
    use std::ops::Bound;
    for bound in [&range.beg, &range.end] {
        if let Bound::Included(v) | Bound::Excluded(v) = bound {
            referenced_params(v, out);
        }
    }
}

fn if_else_params(if_else: &IfElse, out: &mut HashSet<String>) {
    for (cond, then) in &if_else.exprs {
        referenced_params(cond, out);
        referenced_params(then, out);
    }
    if let Some(close) = &if_else.close {
        referenced_params(close, out);
    }
}

fn field_params(field: &Field, out: &mut HashSet<String>) {
    referenced_params(&field.expr, out);
}

pub fn statement_params(statement: &SelectStatement, out: &mut HashSet<String>) {
    statement.fields.items.iter().for_each(|f| field_params(f, out));
    statement.what.iter().for_each(|v| referenced_params(v, out));
    if let Some(cond) = &statement.cond {
        referenced_params(cond, out);
    }
    if let Some(Group::By(idioms)) = &statement.group {
        idioms.iter().for_each(|i| idiom_params(i, out));
    }
    statement
        .order
        .iter()
        .for_each(|o| referenced_params(&o.value, out));
    for v in statement.limit.iter().chain(statement.start.iter()) {
        referenced_params(v, out);
    }
}
