//! The `SELECT` statement under construction and how it turns into IR.
//!
//! Builder operations accumulate clauses on a [`SelectBuilder`]. When an operation would
//! change the meaning of clauses already present (a filter after `LIMIT`, a second
//! `LIMIT`, grouping a paginated query), the current statement is wrapped as the source of
//! a new one and the operation applies to the outer statement.

use std::cmp::Ordering;
use std::sync::Arc;

use super::errors::LoweringError;
use super::lowered::{Lowered, Shape};
use super::LoweringContext;
use crate::schema_catalog::RecordSchema;
use crate::surql_ir::{Field, Fields, Group, Idiom, Order, Part, SelectStatement, Value};

#[derive(Debug, Clone)]
pub(crate) enum Source {
    Table(String),
    Subquery(Box<SelectStatement>),
    /// Output of a `group_by`, built once every aggregate has been hoisted.
    Grouping(usize),
    /// A computed collection. Until a clause is added the builder stands for the value
    /// itself rather than a statement over it.
    Transparent(Value),
}

#[derive(Debug, Clone)]
pub(crate) struct SelectBuilder {
    pub source: Source,
    /// The current document, as seen by lambdas applied to this statement
    pub row: Lowered,
    pub only: bool,
    pub cond: Option<Value>,
    pub order: Vec<Order>,
    pub limit: Option<Value>,
    pub start: Option<Value>,
}

impl SelectBuilder {
    pub fn from_table(table: impl Into<String>, schema: Arc<RecordSchema>) -> Self {
        Self::new(Source::Table(table.into()), Lowered::row(Shape::Record(schema)))
    }

    pub fn new(source: Source, row: Lowered) -> Self {
        Self {
            source,
            row,
            only: false,
            cond: None,
            order: Vec::new(),
            limit: None,
            start: None,
        }
    }

    pub fn is_paginated(&self) -> bool {
        self.limit.is_some() || self.start.is_some()
    }

    fn has_clauses(&self) -> bool {
        self.only
            || self.cond.is_some()
            || !self.order.is_empty()
            || self.limit.is_some()
            || self.start.is_some()
    }

    /// ANDs `cond` into the statement condition.
    pub fn filter(&mut self, cond: Value) {
        self.cond = Some(Value::and(self.cond.take(), cond));
    }
}

/// Alphabetical order of output names, case-insensitive first.
pub(crate) fn output_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Fields of a whole-record projection: database name, aliased to the property name when
/// they differ, sorted by output name.
pub(crate) fn record_fields(schema: &RecordSchema) -> Vec<Field> {
    let mut fields: Vec<(&str, Field)> = schema
        .fields()
        .map(|f| {
            let expr = Value::field(&f.column);
            let field = if f.column == f.property {
                Field::new(expr)
            } else {
                Field::aliased(expr, &f.property)
            };
            (f.property.as_str(), field)
        })
        .collect();
    fields.sort_by(|a, b| output_order(a.0, b.0));
    fields.into_iter().map(|(_, field)| field).collect()
}

/// A named output field; no alias when the expression already is that field.
pub(crate) fn named_field(expr: Value, name: &str) -> Field {
    match &expr {
        Value::Idiom(idiom) if idiom.is_same(&Idiom::field(name)) => Field::new(expr),
        _ => Field::aliased(expr, name),
    }
}

/// The shape a value takes once it has been written into a result document at `path`.
fn projected_member(path: Idiom, shape: &Shape) -> Lowered {
    let shape = match shape {
        Shape::Record(schema) => Shape::Record(schema.clone()),
        Shape::Object(members) => Shape::Object(
            members
                .iter()
                .map(|(name, member)| {
                    let path = path.clone().push(Part::Field(name.clone()));
                    (name.clone(), projected_member(path, &member.shape))
                })
                .collect(),
        ),
        Shape::Scalar | Shape::Group(_) => Shape::Scalar,
    };
    Lowered {
        value: Value::Idiom(path),
        shape,
    }
}

impl LoweringContext<'_> {
    /// The document a statement over the output of `row`'s statement sees.
    pub(crate) fn projected_row(&self, row: &Lowered) -> Lowered {
        match &row.shape {
            Shape::Record(schema) if row.is_row() => {
                Lowered::row(Shape::Record(Arc::new(schema.projected())))
            }
            Shape::Record(schema) => Lowered::row(Shape::Record(schema.clone())),
            Shape::Object(members) => Lowered::row(Shape::Object(
                members
                    .iter()
                    .map(|(name, member)| {
                        (name.clone(), projected_member(Idiom::field(name), &member.shape))
                    })
                    .collect(),
            )),
            Shape::Group(gid) => {
                let key_shape = self.groups[*gid].key.shape.clone();
                Lowered::row(Shape::Object(vec![
                    ("Key".to_string(), projected_member(Idiom::field("Key"), &key_shape)),
                    ("Values".to_string(), Lowered::scalar(Value::field("Values"))),
                ]))
            }
            Shape::Scalar => Lowered::row(Shape::Scalar),
        }
    }

    pub(crate) fn projection(&mut self, row: &Lowered) -> Result<Fields, LoweringError> {
        match &row.shape {
            Shape::Group(gid) => self.group_projection(*gid),
            Shape::Object(members) => {
                let mut fields: Vec<(String, Field)> = members
                    .iter()
                    .map(|(name, member)| (name.clone(), named_field(member.clone().into_value(), name)))
                    .collect();
                fields.sort_by(|a, b| output_order(&a.0, &b.0));
                if fields.is_empty() {
                    return Err(LoweringError::projection("object projection has no members"));
                }
                Ok(Fields::new(fields.into_iter().map(|(_, f)| f).collect()))
            }
            Shape::Record(schema) if row.is_row() => {
                let fields = record_fields(schema);
                if fields.is_empty() {
                    return Err(LoweringError::projection(format!(
                        "table `{}` has no readable and writable fields",
                        schema.table
                    )));
                }
                Ok(Fields::new(fields))
            }
            _ => Ok(Fields::value(row.clone().into_value())),
        }
    }

    /// The `FROM` target of a statement built from `source`.
    pub(crate) fn resolve_source(&mut self, source: Source) -> Result<Value, LoweringError> {
        match source {
            Source::Table(table) => Ok(Value::Table(table)),
            Source::Subquery(statement) => Ok(Value::Subquery(statement)),
            Source::Grouping(gid) => Ok(Value::subquery(self.grouping_statement(gid))),
            Source::Transparent(value) => Ok(value),
        }
    }

    pub(crate) fn build_statement(
        &mut self,
        builder: SelectBuilder,
    ) -> Result<SelectStatement, LoweringError> {
        let fields = self.projection(&builder.row)?;
        let what = self.resolve_source(builder.source)?;
        let mut statement = SelectStatement::new(fields, what);
        statement.only = builder.only;
        statement.cond = builder.cond;
        statement.order = builder.order;
        statement.limit = builder.limit;
        statement.start = builder.start;
        Ok(statement)
    }

    /// `SELECT <fields> FROM <source> [WHERE ...] GROUP ALL`, ordering dropped.
    pub(crate) fn group_all_statement(
        &mut self,
        builder: SelectBuilder,
        fields: Vec<Field>,
    ) -> Result<SelectStatement, LoweringError> {
        let what = self.resolve_source(builder.source)?;
        let mut statement = SelectStatement::new(Fields::new(fields), what);
        statement.cond = builder.cond;
        statement.group = Some(Group::All);
        Ok(statement)
    }

    /// The collection the builder stands for. The shape is the shape of its elements.
    pub(crate) fn finish(&mut self, builder: SelectBuilder) -> Result<Lowered, LoweringError> {
        if let Source::Transparent(value) = &builder.source {
            if !builder.has_clauses() && builder.row.is_row() {
                return Ok(Lowered {
                    value: value.clone(),
                    shape: builder.row.shape,
                });
            }
        }

        let shape = self.projected_row(&builder.row).shape;
        let statement = self.build_statement(builder)?;
        Ok(Lowered {
            value: Value::subquery(statement),
            shape,
        })
    }

    /// Turns the current statement into the source of a fresh one.
    pub(crate) fn wrap(&mut self, builder: SelectBuilder) -> Result<SelectBuilder, LoweringError> {
        if matches!(builder.source, Source::Transparent(_)) && !builder.has_clauses() {
            return Ok(builder);
        }

        log::debug!("Wrapping statement as subquery source");
        let row = self.projected_row(&builder.row);
        let statement = self.build_statement(builder)?;
        Ok(SelectBuilder::new(Source::Subquery(Box::new(statement)), row))
    }
}

/// `(value)[0].name`, reading one column of a single-row result.
pub(crate) fn first_row_field(statement: SelectStatement, name: &str) -> Value {
    Value::Idiom(
        Idiom::start(Value::subquery(statement))
            .push(Part::Index(0))
            .push(Part::Field(name.to_string())),
    )
}
