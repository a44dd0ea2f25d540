use std::collections::BTreeMap;
use std::ops::Bound;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::idiom::Idiom;
use super::operator::{BindingPower, Operator};
use super::statement::SelectStatement;

#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    /// Decimal digits kept verbatim, printed with the `dec` suffix.
    Decimal(String),
}

/// Builtin constants of the query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    MathE,
    MathFrac1Pi,
    MathFrac1Sqrt2,
    MathFrac2Pi,
    MathFrac2SqrtPi,
    MathFracPi2,
    MathFracPi3,
    MathFracPi4,
    MathFracPi6,
    MathFracPi8,
    MathInf,
    MathLn10,
    MathLn2,
    MathLog102,
    MathLog10E,
    MathLog210,
    MathLog2E,
    MathNegInf,
    MathPi,
    MathSqrt2,
    MathTau,
    TimeEpoch,
    TimeMin,
    TimeMax,
    DurationMax,
}

impl Constant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Constant::MathE => "math::E",
            Constant::MathFrac1Pi => "math::FRAC_1_PI",
            Constant::MathFrac1Sqrt2 => "math::FRAC_1_SQRT_2",
            Constant::MathFrac2Pi => "math::FRAC_2_PI",
            Constant::MathFrac2SqrtPi => "math::FRAC_2_SQRT_PI",
            Constant::MathFracPi2 => "math::FRAC_PI_2",
            Constant::MathFracPi3 => "math::FRAC_PI_3",
            Constant::MathFracPi4 => "math::FRAC_PI_4",
            Constant::MathFracPi6 => "math::FRAC_PI_6",
            Constant::MathFracPi8 => "math::FRAC_PI_8",
            Constant::MathInf => "math::INF",
            Constant::MathLn10 => "math::LN_10",
            Constant::MathLn2 => "math::LN_2",
            Constant::MathLog102 => "math::LOG10_2",
            Constant::MathLog10E => "math::LOG10_E",
            Constant::MathLog210 => "math::LOG2_10",
            Constant::MathLog2E => "math::LOG2_E",
            Constant::MathNegInf => "math::NEG_INF",
            Constant::MathPi => "math::PI",
            Constant::MathSqrt2 => "math::SQRT_2",
            Constant::MathTau => "math::TAU",
            Constant::TimeEpoch => "time::EPOCH",
            Constant::TimeMin => "time::MINIMUM",
            Constant::TimeMax => "time::MAXIMUM",
            Constant::DurationMax => "duration::MAX",
        }
    }
}

/// Target type of a cast, `<kind> value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    Any,
    Null,
    Bool,
    Bytes,
    Datetime,
    Decimal,
    Duration,
    Float,
    Int,
    Number,
    Object,
    String,
    Uuid,
    Regex,
    Record(Vec<String>),
    Geometry(Vec<String>),
    Option(Box<Kind>),
    Array(Box<Kind>, Option<u64>),
    Set(Box<Kind>, Option<u64>),
}

/// A `(longitude, latitude)` pair.
pub type Coordinate = (f64, f64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Coordinate),
    Line(Vec<Coordinate>),
    /// Exterior ring followed by interior rings.
    Polygon(Vec<Vec<Coordinate>>),
    MultiPoint(Vec<Coordinate>),
    MultiLine(Vec<Vec<Coordinate>>),
    MultiPolygon(Vec<Vec<Vec<Coordinate>>>),
    Collection(Vec<Geometry>),
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::Line(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLine(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::Collection(_) => "GeometryCollection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKey {
    Number(i64),
    String(String),
    Uuid(Uuid),
}

/// A record identifier, `table:key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId {
    pub table: String,
    pub key: RecordKey,
}

impl RecordId {
    pub fn new(table: impl Into<String>, key: RecordKey) -> Self {
        Self {
            table: table.into(),
            key,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Fully qualified name, e.g. `array::flatten`.
    pub name: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cast {
    pub kind: Kind,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Unary {
        o: Operator,
        v: Value,
    },
    Binary {
        l: Value,
        o: Operator,
        r: Value,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    pub beg: Bound<Value>,
    pub end: Bound<Value>,
}

/// `IF c THEN v ELSE IF ... ELSE v END`
#[derive(Debug, Clone, PartialEq)]
pub struct IfElse {
    pub exprs: Vec<(Value, Value)>,
    pub close: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Null,
    Bool(bool),
    Number(Number),
    Char(char),
    Strand(String),
    Duration(Duration),
    Datetime(DateTime<Utc>),
    Uuid(Uuid),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Geometry(Geometry),
    Thing(RecordId),
    Param(String),
    Idiom(Idiom),
    Table(String),
    Regex(String),
    Cast(Box<Cast>),
    Constant(Constant),
    Function(Box<Function>),
    Subquery(Box<SelectStatement>),
    Expression(Box<Expression>),
    Range(Box<Range>),
    IfElse(Box<IfElse>),
}

impl Value {
    pub fn unary(o: Operator, v: Value) -> Value {
        Value::Expression(Box::new(Expression::Unary { o, v }))
    }

    pub fn binary(l: Value, o: Operator, r: Value) -> Value {
        Value::Expression(Box::new(Expression::Binary { l, o, r }))
    }

    pub fn function(name: impl Into<String>, args: Vec<Value>) -> Value {
        Value::Function(Box::new(Function {
            name: name.into(),
            args,
        }))
    }

    pub fn subquery(statement: SelectStatement) -> Value {
        Value::Subquery(Box::new(statement))
    }

    pub fn field(name: impl Into<String>) -> Value {
        Value::Idiom(Idiom::field(name))
    }

    /// Precedence group of the node, `None` for atoms that never need parentheses.
    pub fn binding_power(&self) -> Option<BindingPower> {
        match self {
            Value::Expression(e) => Some(match e.as_ref() {
                Expression::Unary { .. } => BindingPower::Unary,
                Expression::Binary { o, .. } => o.binding_power(),
            }),
            Value::Cast(_) => Some(BindingPower::Cast),
            Value::Range(_) => Some(BindingPower::Range),
            _ => None,
        }
    }

    /// Plain literals that can sit on either side of `..` without parentheses.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            Value::None
                | Value::Null
                | Value::Bool(_)
                | Value::Number(_)
                | Value::Char(_)
                | Value::Strand(_)
                | Value::Duration(_)
                | Value::Datetime(_)
                | Value::Uuid(_)
                | Value::Constant(_)
        )
    }

    /// Joins two conditions with `&&`, treating `None` as "no condition yet".
    pub fn and(left: Option<Value>, right: Value) -> Value {
        match left {
            Some(left) => Value::binary(left, Operator::And, right),
            None => right,
        }
    }
}

impl From<Idiom> for Value {
    fn from(idiom: Idiom) -> Self {
        Value::Idiom(idiom)
    }
}

impl From<Number> for Value {
    fn from(number: Number) -> Self {
        Value::Number(number)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(Number::Int64(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Strand(v.to_string())
    }
}
