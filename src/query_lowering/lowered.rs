use std::ops::Bound;
use std::sync::Arc;

use crate::schema_catalog::RecordSchema;
use crate::surql_ir::{Expression, Idiom, Part, Value};

/// What a lowered value is known to be, which decides how member access and
/// projections are resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Scalar,
    /// A document of the given record type; members map through the schema.
    Record(Arc<RecordSchema>),
    /// A constructed object; members resolve to the lowered member values.
    Object(Vec<(String, Lowered)>),
    /// The element of a `group_by`; index into the grouping table of the context.
    Group(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lowered {
    pub value: Value,
    pub shape: Shape,
}

impl Lowered {
    pub fn scalar(value: Value) -> Self {
        Self {
            value,
            shape: Shape::Scalar,
        }
    }

    /// The current document of a statement.
    pub fn row(shape: Shape) -> Self {
        Self {
            value: Value::Idiom(Idiom::default()),
            shape,
        }
    }

    /// True for the current document itself, not a path inside it.
    pub fn is_row(&self) -> bool {
        matches!(&self.value, Value::Idiom(idiom) if idiom.is_empty())
    }

    /// Printable value; the current document prints as `$this`.
    pub fn into_value(self) -> Value {
        match self.value {
            Value::Idiom(idiom) if idiom.is_empty() => Value::Param("this".to_string()),
            value => value,
        }
    }

    /// The value as a path that more parts can be appended to.
    pub fn into_idiom(self) -> Idiom {
        match self.value {
            Value::Idiom(idiom) => idiom,
            value => Idiom::start(value),
        }
    }

    /// Rewrites document-relative paths so they reach `hops` levels up the correlation
    /// chain. Nested subqueries keep their own documents and are left alone.
    pub fn reparent(self, hops: usize) -> Self {
        if hops == 0 {
            return self;
        }
        let shape = match self.shape {
            Shape::Object(members) => Shape::Object(
                members
                    .into_iter()
                    .map(|(name, member)| (name, member.reparent(hops)))
                    .collect(),
            ),
            shape => shape,
        };
        Self {
            value: reparent_value(self.value, hops),
            shape,
        }
    }
}

fn reparent_value(value: Value, hops: usize) -> Value {
    match value {
        Value::Idiom(idiom) => Value::Idiom(reparent_idiom(idiom, hops)),
        Value::Param(name) if name == "this" => Value::Idiom(Idiom::parents(hops)),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| reparent_value(v, hops)).collect()),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k, reparent_value(v, hops)))
                .collect(),
        ),
        Value::Function(mut f) => {
            f.args = std::mem::take(&mut f.args)
                .into_iter()
                .map(|v| reparent_value(v, hops))
                .collect();
            Value::Function(f)
        }
        Value::Cast(mut cast) => {
            cast.value = reparent_value(std::mem::replace(&mut cast.value, Value::None), hops);
            Value::Cast(cast)
        }
        Value::Expression(e) => Value::Expression(Box::new(match *e {
            Expression::Unary { o, v } => Expression::Unary {
                o,
                v: reparent_value(v, hops),
            },
            Expression::Binary { l, o, r } => Expression::Binary {
                l: reparent_value(l, hops),
                o,
                r: reparent_value(r, hops),
            },
        })),
        Value::Range(mut range) => {
            range.beg = reparent_bound(std::mem::replace(&mut range.beg, Bound::Unbounded), hops);
            range.end = reparent_bound(std::mem::replace(&mut range.end, Bound::Unbounded), hops);
            Value::Range(range)
        }
        Value::IfElse(mut if_else) => {
            if_else.exprs = std::mem::take(&mut if_else.exprs)
                .into_iter()
                .map(|(c, v)| (reparent_value(c, hops), reparent_value(v, hops)))
                .collect();
            if_else.close = if_else.close.take().map(|v| reparent_value(v, hops));
            Value::IfElse(if_else)
        }
        other => other,
    }
}

fn reparent_bound(bound: Bound<Value>, hops: usize) -> Bound<Value> {
    match bound {
        Bound::Included(v) => Bound::Included(reparent_value(v, hops)),
        Bound::Excluded(v) => Bound::Excluded(reparent_value(v, hops)),
        Bound::Unbounded => Bound::Unbounded,
    }
}

fn reparent_idiom(idiom: Idiom, hops: usize) -> Idiom {
    if idiom.is_empty() {
        return Idiom::parents(hops);
    }
    if matches!(idiom.parts()[0], Part::Field(_) | Part::Parent) {
        return idiom.reparent(hops);
    }
    let mut parts = idiom.0;
    if let Some(Part::Start(start)) = parts.first_mut() {
        let value = std::mem::replace(start, Value::None);
        *start = reparent_value(value, hops);
    }
    Idiom(parts)
}
