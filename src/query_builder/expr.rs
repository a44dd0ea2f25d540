use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::literal::Literal;
use super::query::Query;
use crate::surql_ir::{Constant, Distance, Kind};

static NEXT_LAMBDA: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Negate,
    /// Identity; dropped during lowering.
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    AndAlso,
    OrElse,
    Coalesce,
    Like,
    NotLike,
    Contains,
    ContainsNot,
    ContainsAll,
    ContainsAny,
    ContainsNone,
    Inside,
    NotInside,
    AllInside,
    AnyInside,
    NoneInside,
    Outside,
    Intersects,
    Matches(Option<u8>),
    Knn { k: u32, distance: Option<Distance> },
    Ann { k: u32, ef: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateFn {
    Count,
    Sum,
    Min,
    Max,
    Average,
}

/// A one-parameter function over rows, `|param| body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lambda {
    pub param: String,
    pub body: Expr,
}

impl Lambda {
    pub fn new(param: impl Into<String>, body: Expr) -> Self {
        Self {
            param: param.into(),
            body,
        }
    }

    /// Builds a lambda from a closure. Every call gets a fresh parameter name so nested
    /// lambdas never shadow each other.
    pub fn build<F: FnOnce(Expr) -> Expr>(f: F) -> Self {
        let param = format!("__lambda{}", NEXT_LAMBDA.fetch_add(1, Ordering::Relaxed));
        let body = f(Expr::Parameter(param.clone()));
        Self { param, body }
    }
}

/// Expression tree of the query builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Value known while the query is composed; inlined into the text.
    Constant(Literal),
    Builtin(Constant),
    /// Runtime value captured from the caller; bound as `$name`.
    Variable { name: String, value: Literal },
    /// Reference to the parameter of an enclosing lambda.
    Parameter(String),
    Member { target: Box<Expr>, name: String },
    Index { target: Box<Expr>, index: Box<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Conditional {
        test: Box<Expr>,
        if_true: Box<Expr>,
        if_false: Box<Expr>,
    },
    Cast { kind: Kind, value: Box<Expr> },
    Range {
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
        #[serde(default)]
        start_exclusive: bool,
        #[serde(default)]
        end_inclusive: bool,
    },
    Array(Vec<Expr>),
    /// Constructed object, members in declaration order.
    Object(Vec<(String, Expr)>),
    Call { function: String, args: Vec<Expr> },
    Aggregate {
        source: Box<Expr>,
        function: AggregateFn,
        argument: Option<Box<Lambda>>,
    },
    Query(Box<Query>),
}

impl Expr {
    pub fn constant(value: impl Into<Literal>) -> Self {
        Expr::Constant(value.into())
    }

    pub fn var(name: impl Into<String>, value: impl Into<Literal>) -> Self {
        Expr::Variable {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn builtin(constant: Constant) -> Self {
        Expr::Builtin(constant)
    }

    pub fn call(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            function: function.into(),
            args,
        }
    }

    pub fn array(items: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Array(items.into_iter().collect())
    }

    pub fn object<K: Into<String>>(members: impl IntoIterator<Item = (K, Expr)>) -> Self {
        Expr::Object(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn query(query: Query) -> Self {
        Expr::Query(Box::new(query))
    }

    /// `IF test THEN if_true ELSE if_false END`
    pub fn when(test: Expr, if_true: Expr, if_false: Expr) -> Self {
        Expr::Conditional {
            test: Box::new(test),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
        }
    }

    /// `start..end`
    pub fn range(start: impl Into<Expr>, end: impl Into<Expr>) -> Self {
        Expr::Range {
            start: Some(Box::new(start.into())),
            end: Some(Box::new(end.into())),
            start_exclusive: false,
            end_inclusive: false,
        }
    }

    /// `start..=end`
    pub fn range_inclusive(start: impl Into<Expr>, end: impl Into<Expr>) -> Self {
        Expr::Range {
            start: Some(Box::new(start.into())),
            end: Some(Box::new(end.into())),
            start_exclusive: false,
            end_inclusive: true,
        }
    }

    pub fn member(self, name: impl Into<String>) -> Self {
        Expr::Member {
            target: Box::new(self),
            name: name.into(),
        }
    }

    /// Key of a group produced by `group_by`.
    pub fn key(self) -> Self {
        self.member("Key")
    }

    pub fn at(self, index: impl Into<Expr>) -> Self {
        Expr::Index {
            target: Box::new(self),
            index: Box::new(index.into()),
        }
    }

    pub fn cast(self, kind: Kind) -> Self {
        Expr::Cast {
            kind,
            value: Box::new(self),
        }
    }

    /// Method-style call with `self` as the first argument.
    pub fn apply(self, function: impl Into<String>, mut args: Vec<Expr>) -> Self {
        args.insert(0, self);
        Expr::call(function, args)
    }

    pub fn binary(self, op: BinaryOp, other: impl Into<Expr>) -> Self {
        Expr::Binary {
            op,
            left: Box::new(self),
            right: Box::new(other.into()),
        }
    }

    pub fn eq(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Equal, other)
    }

    pub fn ne(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::NotEqual, other)
    }

    pub fn lt(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::LessThan, other)
    }

    pub fn le(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::LessThanOrEqual, other)
    }

    pub fn gt(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::GreaterThan, other)
    }

    pub fn ge(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::GreaterThanOrEqual, other)
    }

    pub fn and(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::AndAlso, other)
    }

    pub fn or(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::OrElse, other)
    }

    pub fn pow(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Power, other)
    }

    /// `self ?? other`
    pub fn coalesce(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Coalesce, other)
    }

    pub fn contains(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Contains, other)
    }

    pub fn inside(self, other: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Inside, other)
    }

    /// Full-text match, `@@` or `@reference@`.
    pub fn matches(self, other: impl Into<Expr>, reference: Option<u8>) -> Self {
        self.binary(BinaryOp::Matches(reference), other)
    }

    fn aggregate(self, function: AggregateFn, argument: Option<Lambda>) -> Self {
        Expr::Aggregate {
            source: Box::new(self),
            function,
            argument: argument.map(Box::new),
        }
    }

    pub fn count(self) -> Self {
        self.aggregate(AggregateFn::Count, None)
    }

    pub fn count_where<F: FnOnce(Expr) -> Expr>(self, predicate: F) -> Self {
        self.aggregate(AggregateFn::Count, Some(Lambda::build(predicate)))
    }

    pub fn sum(self) -> Self {
        self.aggregate(AggregateFn::Sum, None)
    }

    pub fn sum_by<F: FnOnce(Expr) -> Expr>(self, selector: F) -> Self {
        self.aggregate(AggregateFn::Sum, Some(Lambda::build(selector)))
    }

    pub fn min(self) -> Self {
        self.aggregate(AggregateFn::Min, None)
    }

    pub fn min_by<F: FnOnce(Expr) -> Expr>(self, selector: F) -> Self {
        self.aggregate(AggregateFn::Min, Some(Lambda::build(selector)))
    }

    pub fn max(self) -> Self {
        self.aggregate(AggregateFn::Max, None)
    }

    pub fn max_by<F: FnOnce(Expr) -> Expr>(self, selector: F) -> Self {
        self.aggregate(AggregateFn::Max, Some(Lambda::build(selector)))
    }

    pub fn average(self) -> Self {
        self.aggregate(AggregateFn::Average, None)
    }

    pub fn average_by<F: FnOnce(Expr) -> Expr>(self, selector: F) -> Self {
        self.aggregate(AggregateFn::Average, Some(Lambda::build(selector)))
    }
}

macro_rules! impl_from_literal {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Expr {
                fn from(v: $t) -> Self {
                    Expr::Constant(Literal::from(v))
                }
            }
        )*
    };
}

impl_from_literal!(bool, i32, i64, f32, f64, char, &str, String, std::time::Duration);

impl From<Literal> for Expr {
    fn from(v: Literal) -> Self {
        Expr::Constant(v)
    }
}

impl From<Query> for Expr {
    fn from(v: Query) -> Self {
        Expr::query(v)
    }
}

macro_rules! impl_binary_ops {
    ($($trait:ident :: $method:ident => $op:expr),* $(,)?) => {
        $(
            impl<R: Into<Expr>> std::ops::$trait<R> for Expr {
                type Output = Expr;

                fn $method(self, rhs: R) -> Expr {
                    self.binary($op, rhs)
                }
            }
        )*
    };
}

impl_binary_ops! {
    Add::add => BinaryOp::Add,
    Sub::sub => BinaryOp::Subtract,
    Mul::mul => BinaryOp::Multiply,
    Div::div => BinaryOp::Divide,
    Rem::rem => BinaryOp::Modulo,
    BitAnd::bitand => BinaryOp::AndAlso,
    BitOr::bitor => BinaryOp::OrElse,
}

impl std::ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self),
        }
    }
}

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Negate,
            operand: Box::new(self),
        }
    }
}
