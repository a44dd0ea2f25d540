use super::idiom::Idiom;
use super::value::Value;

/// One projected expression, `expr [AS alias]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub expr: Value,
    pub alias: Option<Idiom>,
}

impl Field {
    pub fn new(expr: Value) -> Self {
        Self { expr, alias: None }
    }

    pub fn aliased(expr: Value, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: Some(Idiom::field(alias)),
        }
    }

    /// Name this field takes in the result document, when it can be named.
    pub fn output_name(&self) -> Option<&str> {
        match (&self.alias, &self.expr) {
            (Some(alias), _) => alias.as_single_field(),
            (None, Value::Idiom(idiom)) => idiom.as_single_field(),
            _ => None,
        }
    }
}

/// Projection list. `value` selects `SELECT VALUE` with a single item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    pub items: Vec<Field>,
    pub value: bool,
}

impl Fields {
    pub fn new(items: Vec<Field>) -> Self {
        Self {
            items,
            value: false,
        }
    }

    pub fn value(expr: Value) -> Self {
        Self {
            items: vec![Field::new(expr)],
            value: true,
        }
    }
}

/// Index hint, `WITH NOINDEX` or `WITH INDEX a, b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum With {
    NoIndex,
    Index(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Group {
    All,
    By(Vec<Idiom>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub value: Value,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Explain {
    pub full: bool,
}

/// `SELECT` statement, clauses in the order they are printed.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub fields: Fields,
    pub only: bool,
    pub what: Vec<Value>,
    pub with: Option<With>,
    pub cond: Option<Value>,
    pub split: Vec<Idiom>,
    pub group: Option<Group>,
    pub order: Vec<Order>,
    pub limit: Option<Value>,
    pub start: Option<Value>,
    pub fetch: Vec<Idiom>,
    pub explain: Option<Explain>,
}

impl SelectStatement {
    pub fn new(fields: Fields, what: Value) -> Self {
        Self {
            fields,
            only: false,
            what: vec![what],
            with: None,
            cond: None,
            split: Vec::new(),
            group: None,
            order: Vec::new(),
            limit: None,
            start: None,
            fetch: Vec::new(),
            explain: None,
        }
    }
}
