//! Expression lowering.

use std::collections::BTreeMap;
use std::ops::Bound;

use super::errors::LoweringError;
use super::function_registry::{get_function_mapping, CallStyle};
use super::lowered::{Lowered, Shape};
use super::LoweringContext;
use crate::query_builder::literal::is_decimal;
use crate::query_builder::{AggregateFn, BinaryOp, Expr, Lambda, Literal, UnaryOp};
use crate::surql_ir::{Cast, Idiom, IfElse, Number, Operator, Part, Range, Value};

pub(crate) fn binary_operator(op: BinaryOp) -> Operator {
    match op {
        BinaryOp::Add => Operator::Add,
        BinaryOp::Subtract => Operator::Sub,
        BinaryOp::Multiply => Operator::Mul,
        BinaryOp::Divide => Operator::Div,
        BinaryOp::Modulo => Operator::Rem,
        BinaryOp::Power => Operator::Pow,
        BinaryOp::Equal => Operator::Exact,
        BinaryOp::NotEqual => Operator::NotEqual,
        BinaryOp::LessThan => Operator::LessThan,
        BinaryOp::LessThanOrEqual => Operator::LessThanOrEqual,
        BinaryOp::GreaterThan => Operator::MoreThan,
        BinaryOp::GreaterThanOrEqual => Operator::MoreThanOrEqual,
        BinaryOp::AndAlso => Operator::And,
        BinaryOp::OrElse => Operator::Or,
        BinaryOp::Coalesce => Operator::Nco,
        BinaryOp::Like => Operator::Like,
        BinaryOp::NotLike => Operator::NotLike,
        BinaryOp::Contains => Operator::Contain,
        BinaryOp::ContainsNot => Operator::NotContain,
        BinaryOp::ContainsAll => Operator::ContainAll,
        BinaryOp::ContainsAny => Operator::ContainAny,
        BinaryOp::ContainsNone => Operator::ContainNone,
        BinaryOp::Inside => Operator::Inside,
        BinaryOp::NotInside => Operator::NotInside,
        BinaryOp::AllInside => Operator::AllInside,
        BinaryOp::AnyInside => Operator::AnyInside,
        BinaryOp::NoneInside => Operator::NoneInside,
        BinaryOp::Outside => Operator::Outside,
        BinaryOp::Intersects => Operator::Intersects,
        BinaryOp::Matches(reference) => Operator::Matches(reference),
        BinaryOp::Knn { k, distance } => Operator::Knn(k, distance),
        BinaryOp::Ann { k, ef } => Operator::Ann(k, ef),
    }
}

/// Aggregates over plain arrays.
fn array_function(function: AggregateFn) -> &'static str {
    match function {
        AggregateFn::Count => "array::len",
        AggregateFn::Sum => "math::sum",
        AggregateFn::Min => "math::min",
        AggregateFn::Max => "math::max",
        AggregateFn::Average => "math::mean",
    }
}

impl LoweringContext<'_> {
    /// Binds the lambda parameter to `argument` in the current scope and lowers the body.
    pub(crate) fn lower_lambda(
        &mut self,
        lambda: &Lambda,
        argument: Lowered,
    ) -> Result<Lowered, LoweringError> {
        self.scope.bind(&lambda.param, argument);
        self.lower_expr(&lambda.body)
    }

    pub(crate) fn lower_expr(&mut self, expr: &Expr) -> Result<Lowered, LoweringError> {
        match expr {
            Expr::Constant(literal) => Ok(Lowered::scalar(self.lower_literal(literal)?)),
            Expr::Builtin(constant) => Ok(Lowered::scalar(Value::Constant(*constant))),
            Expr::Variable { name, value } => {
                let bound = self.parameters.bind(name, value.clone())?;
                Ok(Lowered::scalar(Value::Param(bound)))
            }
            Expr::Parameter(name) => match self.scope.resolve(name) {
                Some((lowered, hops)) => Ok(lowered.clone().reparent(hops)),
                None => Err(LoweringError::projection(format!(
                    "`{}` is not a parameter of an enclosing lambda",
                    name
                ))),
            },
            Expr::Member { target, name } => {
                let target = self.lower_expr(target)?;
                self.member(target, name)
            }
            Expr::Index { target, index } => {
                let target = self.lower_expr(target)?;
                let index = self.lower_expr(index)?.into_value();
                let shape = match target.shape {
                    Shape::Record(ref schema) => Shape::Record(schema.clone()),
                    _ => Shape::Scalar,
                };
                let part = match index {
                    Value::Number(Number::Int32(i)) => Part::Index(i64::from(i)),
                    Value::Number(Number::Int64(i)) => Part::Index(i),
                    other => Part::Value(other),
                };
                Ok(Lowered {
                    value: Value::Idiom(receiver(target).push(part)),
                    shape,
                })
            }
            Expr::Unary { op, operand } => {
                let operand = self.lower_expr(operand)?;
                match op {
                    UnaryOp::Plus => Ok(operand),
                    UnaryOp::Not => Ok(Lowered::scalar(Value::unary(
                        Operator::Not,
                        operand.into_value(),
                    ))),
                    UnaryOp::Negate => Ok(Lowered::scalar(Value::unary(
                        Operator::Neg,
                        operand.into_value(),
                    ))),
                }
            }
            Expr::Binary { op, left, right } => {
                let left = self.lower_expr(left)?.into_value();
                let right = self.lower_expr(right)?.into_value();
                Ok(Lowered::scalar(Value::binary(left, binary_operator(*op), right)))
            }
            Expr::Conditional {
                test,
                if_true,
                if_false,
            } => {
                let test = self.lower_expr(test)?.into_value();
                let then = self.lower_expr(if_true)?.into_value();
                let otherwise = self.lower_expr(if_false)?.into_value();
                let mut exprs = vec![(test, then)];
                // Else-if chains print as one statement
                let close = match otherwise {
                    Value::IfElse(nested) => {
                        exprs.extend(nested.exprs);
                        nested.close
                    }
                    other => Some(other),
                };
                Ok(Lowered::scalar(Value::IfElse(Box::new(IfElse {
                    exprs,
                    close,
                }))))
            }
            Expr::Cast { kind, value } => {
                let value = self.lower_expr(value)?.into_value();
                Ok(Lowered::scalar(Value::Cast(Box::new(Cast {
                    kind: kind.clone(),
                    value,
                }))))
            }
            Expr::Range {
                start,
                end,
                start_exclusive,
                end_inclusive,
            } => {
                let beg = match start {
                    Some(start) => {
                        let value = self.lower_expr(start)?.into_value();
                        if *start_exclusive {
                            Bound::Excluded(value)
                        } else {
                            Bound::Included(value)
                        }
                    }
                    None => Bound::Unbounded,
                };
                let end = match end {
                    Some(end) => {
                        let value = self.lower_expr(end)?.into_value();
                        if *end_inclusive {
                            Bound::Included(value)
                        } else {
                            Bound::Excluded(value)
                        }
                    }
                    None => Bound::Unbounded,
                };
                Ok(Lowered::scalar(Value::Range(Box::new(Range { beg, end }))))
            }
            Expr::Array(items) => {
                let items = items
                    .iter()
                    .map(|item| self.lower_expr(item).map(Lowered::into_value))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Lowered::scalar(Value::Array(items)))
            }
            Expr::Object(members) => self.lower_object(members),
            Expr::Call { function, args } => self.lower_call(function, args),
            Expr::Aggregate {
                source,
                function,
                argument,
            } => {
                let hint = self.aggregate_alias.take();
                let source = match source.as_ref() {
                    Expr::Member { target, name } if name == "Values" => {
                        let target = self.lower_expr(target)?;
                        if let Some(gid) = group_of(&target) {
                            return self.hoist_aggregate(gid, *function, argument.as_deref(), hint);
                        }
                        self.member(target, name)?
                    }
                    other => self.lower_expr(other)?,
                };
                self.lower_aggregate(source, *function, argument.as_deref(), hint)
            }
            Expr::Query(query) => self.lower_query(query),
        }
    }

    pub(crate) fn lower_literal(&mut self, literal: &Literal) -> Result<Value, LoweringError> {
        Ok(match literal {
            Literal::None => Value::None,
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int32(i) => Value::Number(Number::Int32(*i)),
            Literal::Int64(i) => Value::Number(Number::Int64(*i)),
            Literal::Float32(f) => Value::Number(Number::Float32(*f)),
            Literal::Float64(f) => Value::Number(Number::Float64(*f)),
            Literal::Decimal(digits) => {
                if !is_decimal(digits) {
                    return Err(LoweringError::unsupported(format!(
                        "`{}` is not a decimal literal",
                        digits
                    )));
                }
                Value::Number(Number::Decimal(digits.clone()))
            }
            Literal::Char(c) => Value::Char(*c),
            Literal::String(s) => Value::Strand(s.clone()),
            Literal::Duration(d) => Value::Duration(*d),
            Literal::DateTime(dt) => Value::Datetime(*dt),
            Literal::Uuid(u) => Value::Uuid(*u),
            Literal::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.lower_literal(item))
                    .collect::<Result<_, _>>()?,
            ),
            Literal::Object(entries) => {
                let mut object = BTreeMap::new();
                for (key, value) in entries {
                    object.insert(key.clone(), self.lower_literal(value)?);
                }
                Value::Object(object)
            }
            Literal::Geometry(geometry) => Value::Geometry(geometry.clone()),
            Literal::RecordId(_) => Value::Param(self.parameters.bind_record_id(literal.clone())),
            Literal::Regex(pattern) => Value::Regex(pattern.clone()),
        })
    }

    fn lower_object(&mut self, members: &[(String, Expr)]) -> Result<Lowered, LoweringError> {
        let mut lowered = Vec::with_capacity(members.len());
        for (name, member) in members {
            if lowered.iter().any(|(existing, _): &(String, Lowered)| existing == name) {
                return Err(LoweringError::projection(format!(
                    "member `{}` is defined twice",
                    name
                )));
            }
            if matches!(member, Expr::Aggregate { .. }) {
                self.aggregate_alias = Some(name.clone());
            }
            let value = self.lower_expr(member);
            self.aggregate_alias = None;
            lowered.push((name.clone(), value?));
        }

        let value = Value::Object(
            lowered
                .iter()
                .map(|(name, member)| (name.clone(), member.clone().into_value()))
                .collect(),
        );
        Ok(Lowered {
            value,
            shape: Shape::Object(lowered),
        })
    }

    /// `target.name`, resolved through what `target` is known to be.
    pub(crate) fn member(
        &mut self,
        mut target: Lowered,
        name: &str,
    ) -> Result<Lowered, LoweringError> {
        match std::mem::replace(&mut target.shape, Shape::Scalar) {
            Shape::Record(schema) => {
                let field = schema.field(name).ok_or_else(|| {
                    LoweringError::projection(format!(
                        "`{}` is not a mapped field of `{}`",
                        name, schema.table
                    ))
                })?;
                let shape = match &field.record {
                    Some(table) => {
                        let nested = self.provider.schema(table).ok_or_else(|| {
                            LoweringError::InvalidTableReference(format!(
                                "`{}.{}` references unknown table `{}`",
                                schema.table, name, table
                            ))
                        })?;
                        Shape::Record(nested)
                    }
                    None => Shape::Scalar,
                };
                Ok(Lowered {
                    value: Value::Idiom(target.into_idiom().push(Part::Field(field.column.clone()))),
                    shape,
                })
            }
            Shape::Object(members) => members
                .into_iter()
                .find(|(member, _)| member == name)
                .map(|(_, lowered)| lowered)
                .ok_or_else(|| {
                    LoweringError::projection(format!("object has no member `{}`", name))
                }),
            Shape::Group(gid) => self.group_member(gid, name),
            Shape::Scalar => Ok(Lowered::scalar(Value::Idiom(
                receiver(target).push(Part::Field(name.to_string())),
            ))),
        }
    }

    fn lower_call(&mut self, function: &str, args: &[Expr]) -> Result<Lowered, LoweringError> {
        let mapping = get_function_mapping(function).ok_or_else(|| {
            LoweringError::unsupported(format!("function `{}` is not supported", function))
        })?;
        if !mapping.accepts(args.len()) {
            return Err(LoweringError::unsupported(format!(
                "`{}` does not take {} argument(s)",
                function,
                args.len()
            )));
        }

        let mut lowered = args
            .iter()
            .map(|arg| self.lower_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;

        match mapping.style {
            CallStyle::Function => Ok(Lowered::scalar(Value::function(
                mapping.surql_name,
                lowered.into_iter().map(Lowered::into_value).collect(),
            ))),
            CallStyle::Method => {
                let target = lowered.remove(0);
                let rest = lowered.into_iter().map(Lowered::into_value).collect();
                Ok(Lowered::scalar(Value::Idiom(
                    receiver(target).push(Part::Method(mapping.surql_name.to_string(), rest)),
                )))
            }
        }
    }

    fn lower_aggregate(
        &mut self,
        source: Lowered,
        function: AggregateFn,
        argument: Option<&Lambda>,
        hint: Option<String>,
    ) -> Result<Lowered, LoweringError> {
        if let Some(gid) = group_of(&source) {
            return self.hoist_aggregate(gid, function, argument, hint);
        }

        if argument.is_some() {
            return Err(LoweringError::unsupported(
                "aggregates with a selector or predicate are only supported over groups",
            ));
        }
        if function != AggregateFn::Count && !matches!(source.shape, Shape::Scalar) {
            return Err(LoweringError::unsupported(
                "aggregating a collection of documents needs a selector",
            ));
        }
        Ok(Lowered::scalar(Value::function(
            array_function(function),
            vec![source.into_value()],
        )))
    }
}

/// Aggregates over `g` or `g.Values` are computed by the grouping statement.
fn group_of(source: &Lowered) -> Option<usize> {
    match &source.shape {
        Shape::Group(gid) if source.is_row() => Some(*gid),
        _ => None,
    }
}

/// The value as an idiom further parts can be appended to; the current document becomes
/// `$this`.
fn receiver(target: Lowered) -> Idiom {
    match target.into_value() {
        Value::Idiom(idiom) => idiom,
        value => Idiom::start(value),
    }
}
