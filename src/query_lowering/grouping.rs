//! `group_by` lowering.
//!
//! A grouped query is printed as three statements:
//!
//! ```text
//! SELECT <projection over Key/Values>                          -- outer, over the groups
//! FROM (SELECT <keys>, <aggregates> FROM src GROUP BY <keys>)  -- one row per group
//! ```
//!
//! and, wherever `Values` is used, a statement correlated back to the group row through
//! `$parent`:
//!
//! ```text
//! (SELECT <element> FROM src WHERE <key> == $parent.<key>)
//! ```
//!
//! Aggregates over a group are hoisted into the grouping statement while the outer
//! statement is lowered, so the grouping statement is only built once the outer one is
//! finished.

use super::errors::LoweringError;
use super::lowered::{Lowered, Shape};
use super::select_builder::{named_field, output_order, SelectBuilder, Source};
use super::LoweringContext;
use crate::query_builder::{AggregateFn, Lambda};
use crate::surql_ir::{Field, Fields, Group, Idiom, Operator, Order, SelectStatement, Value};

#[derive(Debug, Clone)]
pub(crate) struct GroupState {
    /// `FROM` target shared by the grouping and values statements
    what: Value,
    cond: Option<Value>,
    order: Vec<Order>,
    /// Row of the grouped statement, i.e. one element of `Values`
    element: Lowered,
    key_fields: Vec<Field>,
    /// `(key expression, output name)`, correlated as `expr == $parent.name`
    keys: Vec<(Value, String)>,
    aggregates: Vec<Field>,
    /// Key as seen from the statement over the groups
    pub key: Lowered,
}

impl GroupState {
    fn output_names(&self) -> impl Iterator<Item = &str> {
        self.key_fields
            .iter()
            .chain(self.aggregates.iter())
            .filter_map(Field::output_name)
    }
}

fn grouped_function(function: AggregateFn) -> &'static str {
    match function {
        AggregateFn::Count => "count",
        AggregateFn::Sum => "math::sum",
        AggregateFn::Min => "array::min",
        AggregateFn::Max => "array::max",
        AggregateFn::Average => "math::mean",
    }
}

impl LoweringContext<'_> {
    pub(crate) fn group_by(
        &mut self,
        builder: SelectBuilder,
        key: &Lambda,
    ) -> Result<SelectBuilder, LoweringError> {
        let element = builder.row.clone();
        let key_lowered = self.lower_lambda(key, element.clone())?;

        let mut key_fields = Vec::new();
        let mut keys = Vec::new();
        let group_key = match key_lowered.shape {
            Shape::Object(mut members) => {
                members.sort_by(|a, b| output_order(&a.0, &b.0));
                let mut outer = Vec::with_capacity(members.len());
                for (name, member) in members {
                    let shape = member_key_shape(&member.shape);
                    let expr = member.into_value();
                    key_fields.push(named_field(expr.clone(), &name));
                    keys.push((expr, name.clone()));
                    outer.push((
                        name.clone(),
                        Lowered {
                            value: Value::field(&name),
                            shape,
                        },
                    ));
                }
                let value = Value::Object(
                    outer
                        .iter()
                        .map(|(name, member)| (name.clone(), member.value.clone()))
                        .collect(),
                );
                Lowered {
                    value,
                    shape: Shape::Object(outer),
                }
            }
            Shape::Group(_) => {
                return Err(LoweringError::unsupported("cannot group by a group"));
            }
            shape => {
                let shape = member_key_shape(&shape);
                let expr = key_lowered.value;
                let single = match &expr {
                    Value::Idiom(idiom) => idiom.as_single_field().map(str::to_string),
                    _ => None,
                };
                let name = match single {
                    Some(field) => {
                        key_fields.push(Field::new(expr.clone()));
                        field
                    }
                    None => {
                        let expr = Lowered::scalar(expr.clone()).into_value();
                        key_fields.push(Field::aliased(expr, "Key"));
                        "Key".to_string()
                    }
                };
                keys.push((key_fields[0].expr.clone(), name.clone()));
                Lowered {
                    value: Value::field(&name),
                    shape,
                }
            }
        };

        let what = self.resolve_source(builder.source)?;
        let gid = self.groups.len();
        log::debug!("Grouping by {} key(s) as group #{}", keys.len(), gid);
        self.groups.push(GroupState {
            what,
            cond: builder.cond,
            order: builder.order,
            element,
            key_fields,
            keys,
            aggregates: Vec::new(),
            key: group_key,
        });

        Ok(SelectBuilder::new(
            Source::Grouping(gid),
            Lowered::row(Shape::Group(gid)),
        ))
    }

    /// `SELECT <keys>, <aggregates> FROM src [WHERE ...] GROUP BY <keys>`
    pub(crate) fn grouping_statement(&self, gid: usize) -> SelectStatement {
        let group = &self.groups[gid];
        let fields = group
            .key_fields
            .iter()
            .chain(group.aggregates.iter())
            .cloned()
            .collect();
        let mut statement = SelectStatement::new(Fields::new(fields), group.what.clone());
        statement.cond = group.cond.clone();
        statement.group = Some(Group::By(
            group
                .keys
                .iter()
                .map(|(_, name)| Idiom::field(name))
                .collect(),
        ));
        statement
    }

    /// Elements of the current group, correlated to the group row through `$parent`.
    pub(crate) fn group_values(&mut self, gid: usize) -> Result<Lowered, LoweringError> {
        let group = self.groups[gid].clone();
        let fields = self.projection(&group.element)?;
        let shape = self.projected_row(&group.element).shape;

        let mut cond = group.cond;
        for (expr, name) in group.keys {
            let correlation = Value::binary(
                expr,
                Operator::Exact,
                Value::Idiom(Idiom::field(name).reparent(1)),
            );
            cond = Some(Value::and(cond, correlation));
        }

        let mut statement = SelectStatement::new(fields, group.what);
        statement.cond = cond;
        statement.order = group.order;
        Ok(Lowered {
            value: Value::subquery(statement),
            shape,
        })
    }

    /// Default projection of a group row: `<key> AS Key, (<values>) AS Values`.
    pub(crate) fn group_projection(&mut self, gid: usize) -> Result<Fields, LoweringError> {
        let key = self.groups[gid].key.clone().into_value();
        let values = self.group_values(gid)?;
        Ok(Fields::new(vec![
            named_field(key, "Key"),
            Field::aliased(values.value, "Values"),
        ]))
    }

    /// Member access on a group row.
    pub(crate) fn group_member(&mut self, gid: usize, name: &str) -> Result<Lowered, LoweringError> {
        match name {
            "Key" => Ok(self.groups[gid].key.clone()),
            "Values" => self.group_values(gid),
            other => Err(LoweringError::projection(format!(
                "groups expose `Key` and `Values`, not `{}`",
                other
            ))),
        }
    }

    /// Moves an aggregate over a group into the grouping statement and returns the
    /// column that holds its result.
    pub(crate) fn hoist_aggregate(
        &mut self,
        gid: usize,
        function: AggregateFn,
        argument: Option<&Lambda>,
        hint: Option<String>,
    ) -> Result<Lowered, LoweringError> {
        let element = self.groups[gid].element.clone();
        let mut args = Vec::new();
        match (function, argument) {
            (AggregateFn::Count, None) => {}
            (_, Some(lambda)) => args.push(self.lower_lambda(lambda, element)?.into_value()),
            (_, None) => match element.shape {
                Shape::Scalar => args.push(element.into_value()),
                _ => {
                    return Err(LoweringError::unsupported(
                        "aggregating a group of documents needs a selector",
                    ))
                }
            },
        }
        let expr = Value::function(grouped_function(function), args);

        let group = &mut self.groups[gid];
        if let Some(existing) = group
            .aggregates
            .iter()
            .find(|field| field.expr == expr)
            .and_then(Field::output_name)
        {
            return Ok(Lowered::scalar(Value::field(existing)));
        }

        let taken: Vec<String> = group.output_names().map(str::to_string).collect();
        let alias = match hint {
            Some(hint) if !taken.contains(&hint) => hint,
            _ => (0..)
                .map(|n| match n {
                    0 => "Value".to_string(),
                    n => format!("Value{}", n),
                })
                .find(|name| !taken.contains(name))
                .unwrap_or_default(),
        };
        log::trace!("Hoisting aggregate into group #{} as `{}`", gid, alias);
        group.aggregates.push(Field::aliased(expr, &alias));
        Ok(Lowered::scalar(Value::field(alias)))
    }
}

/// Keys that hold records can still be navigated from the outer statement.
fn member_key_shape(shape: &Shape) -> Shape {
    match shape {
        Shape::Record(schema) => Shape::Record(schema.clone()),
        _ => Shape::Scalar,
    }
}
