//! Lowering of builder queries into the SurrealQL IR.
//!
//! The operations of a [`Query`] are applied in order to a [`SelectBuilder`]. Operations
//! that would change the meaning of clauses already present wrap the statement into a
//! subquery first. Terminal operations (counts, element access, quantifiers) turn the
//! statement into a single expression.
//!
//! Runtime values are bound as parameters while lowering. Bindings that end up in parts
//! of the query later dropped (an `order_by` replaced by another one) are pruned once the
//! whole query is lowered, so the parameter table holds exactly what the text references.

pub mod errors;
mod expressions;
pub mod function_registry;
mod grouping;
pub mod lowered;
pub mod parameters;
pub mod scope;
mod select_builder;

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::TranslatorConfig;
use crate::query_builder::{Expr, Lambda, Literal, Query, QueryOp, QueryRoot};
use crate::schema_catalog::{RecordSchema, SchemaProvider};
use crate::surql_ir::{Direction, Field, Number, Operator, Order, Part, Value};

pub use errors::LoweringError;
use grouping::GroupState;
pub use lowered::{Lowered, Shape};
pub use parameters::{referenced_params, ParameterBinder, ParameterTable};
pub use scope::LoweringScope;
use select_builder::{first_row_field, SelectBuilder, Source};

pub type LoweringResult<T> = Result<T, LoweringError>;

/// Lowers `query` into a single IR value and the parameters it references.
pub fn lower(
    query: &Query,
    provider: &dyn SchemaProvider,
    config: &TranslatorConfig,
) -> LoweringResult<(Value, ParameterTable)> {
    LoweringContext::new(provider, config).lower(query)
}

/// Work left for after the query scope has been left: arguments of terminal operations
/// belong to the enclosing scope, not to the rows of the query.
enum Outer<'q> {
    Contains(&'q Expr),
    ElementAt(&'q Expr, Option<&'q Literal>),
    Default(&'q Literal),
}

/// State of one lowering pass.
pub struct LoweringContext<'a> {
    provider: &'a dyn SchemaProvider,
    scope: LoweringScope,
    parameters: ParameterBinder<'a>,
    groups: Vec<GroupState>,
    /// Member name an aggregate is being assigned to, used to name hoisted columns
    aggregate_alias: Option<String>,
}

impl<'a> LoweringContext<'a> {
    pub fn new(provider: &'a dyn SchemaProvider, config: &'a TranslatorConfig) -> Self {
        Self {
            provider,
            scope: LoweringScope::root(),
            parameters: ParameterBinder::new(config),
            groups: Vec::new(),
            aggregate_alias: None,
        }
    }

    pub fn lower(mut self, query: &Query) -> LoweringResult<(Value, ParameterTable)> {
        let value = self.lower_query(query)?.into_value();

        let mut referenced = HashSet::new();
        referenced_params(&value, &mut referenced);
        let mut table = self.parameters.into_table();
        let bound = table.len();
        table.retain_referenced(&referenced);
        if table.len() != bound {
            log::debug!("Pruned {} unreferenced parameter(s)", bound - table.len());
        }
        Ok((value, table))
    }

    fn resolve_root(&self, root: &QueryRoot) -> LoweringResult<Arc<RecordSchema>> {
        if let (Some(built_from), Some(current)) = (root.catalog, self.provider.catalog_id()) {
            if built_from != current {
                return Err(LoweringError::InvalidTableReference(format!(
                    "query over `{}` was built from a different schema catalog",
                    root.table
                )));
            }
        }
        self.provider.schema(&root.table).ok_or_else(|| {
            LoweringError::InvalidTableReference(format!("unknown table `{}`", root.table))
        })
    }

    /// Lowers a whole query, nested or not. The result shape is the shape of one
    /// element, or scalar for queries ending in an aggregate.
    pub(crate) fn lower_query(&mut self, query: &Query) -> LoweringResult<Lowered> {
        let schema = self.resolve_root(&query.root)?;
        log::trace!(
            "Lowering query over `{}` with {} operation(s) at depth {}",
            query.root.table,
            query.operations.len(),
            self.scope.depth()
        );

        self.scope.enter(&query.root.table);
        let inner = self.lower_operations(query, schema);
        self.scope.exit();

        let (lowered, outer) = inner?;
        match outer {
            None => Ok(lowered),
            Some(Outer::Contains(value)) => {
                let value = self.lower_expr(value)?.into_value();
                Ok(Lowered::scalar(Value::binary(
                    lowered.into_value(),
                    Operator::Contain,
                    value,
                )))
            }
            Some(Outer::ElementAt(index, default)) => {
                let index = self.lower_expr(index)?.into_value();
                let part = match index {
                    Value::Number(Number::Int32(i)) => Part::Index(i64::from(i)),
                    Value::Number(Number::Int64(i)) => Part::Index(i),
                    other => Part::Value(other),
                };
                let element = Lowered {
                    shape: lowered.shape.clone(),
                    value: Value::Idiom(lowered.into_idiom().push(part)),
                };
                match default {
                    Some(default) => self.or_default(element, default),
                    None => Ok(element),
                }
            }
            Some(Outer::Default(default)) => self.or_default(lowered, default),
        }
    }

    fn or_default(&mut self, element: Lowered, default: &Literal) -> LoweringResult<Lowered> {
        let default = self.lower_literal(default)?;
        Ok(Lowered {
            shape: element.shape.clone(),
            value: Value::binary(element.into_value(), Operator::Nco, default),
        })
    }

    fn lower_operations<'q>(
        &mut self,
        query: &'q Query,
        schema: Arc<RecordSchema>,
    ) -> LoweringResult<(Lowered, Option<Outer<'q>>)> {
        let mut builder = SelectBuilder::from_table(&query.root.table, schema);
        for (i, op) in query.operations.iter().enumerate() {
            if op.is_terminal() {
                if let Some(next) = query.operations.get(i + 1) {
                    return Err(LoweringError::unsupported(format!(
                        "`{}` cannot follow `{}`",
                        next.name(),
                        op.name()
                    )));
                }
                return self.apply_terminal(builder, op);
            }
            builder = self.apply(builder, op)?;
        }
        Ok((self.finish(builder)?, None))
    }

    fn apply(&mut self, mut builder: SelectBuilder, op: &QueryOp) -> LoweringResult<SelectBuilder> {
        match op {
            QueryOp::Where(predicate) => {
                let mut builder = self.wrap_if(builder, |b| b.is_paginated())?;
                let cond = self.lower_lambda(predicate, builder.row.clone())?;
                builder.filter(cond.into_value());
                Ok(builder)
            }
            QueryOp::Select(selector) => {
                builder.row = self.lower_lambda(selector, builder.row.clone())?;
                Ok(builder)
            }
            QueryOp::SelectMany(selector) => {
                let builder = self.wrap_if(builder, |b| b.is_paginated())?;
                let collection = self.lower_lambda(selector, builder.row.clone())?;
                let element = collection.shape.clone();
                let flatten = Value::function("array::flatten", vec![collection.into_value()]);
                let statement = self.group_all_statement(
                    builder,
                    vec![Field::aliased(flatten, "Values")],
                )?;
                Ok(SelectBuilder::new(
                    Source::Transparent(first_row_field(statement, "Values")),
                    Lowered::row(element),
                ))
            }
            QueryOp::OrderBy(key) | QueryOp::OrderByDescending(key) => {
                let mut builder = self.wrap_if(builder, |b| b.is_paginated())?;
                let order = self.order(key, &builder, op)?;
                builder.order = vec![order];
                Ok(builder)
            }
            QueryOp::ThenBy(key) | QueryOp::ThenByDescending(key) => {
                if builder.order.is_empty() || builder.is_paginated() {
                    return Err(LoweringError::unsupported(format!(
                        "`{}` must directly follow an ordering",
                        op.name()
                    )));
                }
                let order = self.order(key, &builder, op)?;
                builder.order.push(order);
                Ok(builder)
            }
            QueryOp::GroupBy(key) => {
                let builder = self.wrap_if(builder, |b| {
                    b.is_paginated()
                        || matches!(b.source, Source::Grouping(_))
                        || matches!(b.row.shape, Shape::Group(_))
                })?;
                self.group_by(builder, key)
            }
            QueryOp::Skip(count) => {
                let mut builder = self.wrap_if(builder, |b| b.is_paginated())?;
                builder.start = Some(self.lower_expr(count)?.into_value());
                Ok(builder)
            }
            QueryOp::Take(count) => {
                let mut builder = self.wrap_if(builder, |b| b.limit.is_some())?;
                builder.limit = Some(self.lower_expr(count)?.into_value());
                Ok(builder)
            }
            QueryOp::Distinct => {
                let builder = self.wrap_if(builder, |b| b.is_paginated())?;
                self.distinct(builder)
            }
            terminal => Err(LoweringError::unsupported(format!(
                "`{}` ends a query",
                terminal.name()
            ))),
        }
    }

    fn wrap_if(
        &mut self,
        builder: SelectBuilder,
        needs_wrap: impl FnOnce(&SelectBuilder) -> bool,
    ) -> LoweringResult<SelectBuilder> {
        if needs_wrap(&builder) {
            self.wrap(builder)
        } else {
            Ok(builder)
        }
    }

    fn order(&mut self, key: &Lambda, builder: &SelectBuilder, op: &QueryOp) -> LoweringResult<Order> {
        let value = self.lower_lambda(key, builder.row.clone())?.into_value();
        let direction = match op {
            QueryOp::OrderByDescending(_) | QueryOp::ThenByDescending(_) => Direction::Descending,
            _ => Direction::Ascending,
        };
        Ok(Order { value, direction })
    }

    fn distinct(&mut self, builder: SelectBuilder) -> LoweringResult<SelectBuilder> {
        if matches!(builder.row.shape, Shape::Scalar) {
            let distinct = Value::function("array::distinct", vec![builder.row.clone().into_value()]);
            let statement =
                self.group_all_statement(builder, vec![Field::aliased(distinct, "Values")])?;
            return Ok(SelectBuilder::new(
                Source::Transparent(first_row_field(statement, "Values")),
                Lowered::row(Shape::Scalar),
            ));
        }

        let collection = self.finish(builder)?;
        let value = Value::function("array::distinct", vec![collection.value]);
        Ok(SelectBuilder::new(
            Source::Transparent(value),
            Lowered::row(collection.shape),
        ))
    }

    /// Filters by the optional predicate of a terminal operation.
    fn filter_by(
        &mut self,
        builder: SelectBuilder,
        predicate: Option<&Lambda>,
    ) -> LoweringResult<SelectBuilder> {
        match predicate {
            Some(predicate) => self.apply(builder, &QueryOp::Where(predicate.clone())),
            None => Ok(builder),
        }
    }

    fn apply_terminal<'q>(
        &mut self,
        builder: SelectBuilder,
        op: &'q QueryOp,
    ) -> LoweringResult<(Lowered, Option<Outer<'q>>)> {
        match op {
            QueryOp::Count(predicate) | QueryOp::LongCount(predicate) => {
                let builder = self.wrap_if(builder, |b| b.is_paginated())?;
                let args = match predicate {
                    Some(predicate) => {
                        vec![self.lower_lambda(predicate, builder.row.clone())?.into_value()]
                    }
                    None => Vec::new(),
                };
                let count = Field::new(Value::function("count", args));
                let statement = self.group_all_statement(builder, vec![count])?;
                Ok((Lowered::scalar(first_row_field(statement, "count")), None))
            }
            QueryOp::Sum(selector)
            | QueryOp::Min(selector)
            | QueryOp::Max(selector)
            | QueryOp::Average(selector) => {
                let (function, alias) = match op {
                    QueryOp::Sum(_) => ("math::sum", "Sum"),
                    QueryOp::Min(_) => ("math::min", "Min"),
                    QueryOp::Max(_) => ("math::max", "Max"),
                    _ => ("math::mean", "Avg"),
                };
                let builder = self.wrap_if(builder, |b| b.is_paginated())?;
                let argument = match selector {
                    Some(selector) => self.lower_lambda(selector, builder.row.clone())?,
                    None => builder.row.clone(),
                };
                if !matches!(argument.shape, Shape::Scalar) {
                    return Err(LoweringError::unsupported(format!(
                        "`{}` needs a selector or a scalar projection",
                        op.name()
                    )));
                }
                let field = Field::aliased(
                    Value::function(function, vec![argument.into_value()]),
                    alias,
                );
                let statement = self.group_all_statement(builder, vec![field])?;
                Ok((Lowered::scalar(first_row_field(statement, alias)), None))
            }
            QueryOp::All(predicate) => {
                let mut builder = self.wrap_if(builder, |b| b.is_paginated())?;
                let cond = self.lower_lambda(predicate, builder.row.clone())?;
                builder.filter(Value::unary(Operator::Not, cond.into_value()));
                let rows = self.finish(builder)?;
                Ok((Lowered::scalar(count_compare(rows, Operator::Exact)), None))
            }
            QueryOp::Any(predicate) => {
                let builder = self.filter_by(builder, predicate.as_ref())?;
                let rows = self.finish(builder)?;
                Ok((Lowered::scalar(count_compare(rows, Operator::MoreThan)), None))
            }
            QueryOp::Contains(value) => Ok((self.finish(builder)?, Some(Outer::Contains(value)))),
            QueryOp::ElementAt(index) => {
                Ok((self.finish(builder)?, Some(Outer::ElementAt(index, None))))
            }
            QueryOp::ElementAtOrDefault { index, default } => Ok((
                self.finish(builder)?,
                Some(Outer::ElementAt(index, Some(default))),
            )),
            QueryOp::First(predicate) => Ok((self.first(builder, predicate.as_ref())?, None)),
            QueryOp::FirstOrDefault { predicate, default } => Ok((
                self.first(builder, predicate.as_ref())?,
                Some(Outer::Default(default)),
            )),
            QueryOp::Last(predicate) => Ok((self.last(builder, predicate.as_ref())?, None)),
            QueryOp::LastOrDefault { predicate, default } => Ok((
                self.last(builder, predicate.as_ref())?,
                Some(Outer::Default(default)),
            )),
            QueryOp::Single(predicate) => Ok((self.single(builder, predicate.as_ref())?, None)),
            QueryOp::SingleOrDefault { predicate, default } => Ok((
                self.single(builder, predicate.as_ref())?,
                Some(Outer::Default(default)),
            )),
            other => Err(LoweringError::unsupported(format!(
                "`{}` does not end a query",
                other.name()
            ))),
        }
    }

    /// `(S)[0]`
    fn first(&mut self, builder: SelectBuilder, predicate: Option<&Lambda>) -> LoweringResult<Lowered> {
        let builder = self.filter_by(builder, predicate)?;
        let rows = self.finish(builder)?;
        Ok(Lowered {
            shape: rows.shape.clone(),
            value: Value::Idiom(rows.into_idiom().push(Part::Index(0))),
        })
    }

    /// `array::last((S))`
    fn last(&mut self, builder: SelectBuilder, predicate: Option<&Lambda>) -> LoweringResult<Lowered> {
        let builder = self.filter_by(builder, predicate)?;
        let rows = self.finish(builder)?;
        Ok(Lowered {
            shape: rows.shape.clone(),
            value: Value::function("array::last", vec![rows.value]),
        })
    }

    /// `SELECT ... FROM ONLY ...`, which fails at runtime unless exactly one row matches.
    fn single(&mut self, builder: SelectBuilder, predicate: Option<&Lambda>) -> LoweringResult<Lowered> {
        let mut builder = self.filter_by(builder, predicate)?;
        builder.only = true;
        self.finish(builder)
    }
}

/// `array::len((S)) <op> 0`
fn count_compare(rows: Lowered, op: Operator) -> Value {
    Value::binary(
        Value::function("array::len", vec![rows.value]),
        op,
        Value::from(0i64),
    )
}
