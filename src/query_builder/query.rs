use serde::{Deserialize, Serialize};

use super::expr::{Expr, Lambda};
use super::literal::Literal;
use crate::schema_catalog::CatalogId;

/// The collection a query starts from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRoot {
    pub table: String,
    /// Catalog the root was created from; unbound roots resolve against any provider.
    #[serde(skip)]
    pub catalog: Option<CatalogId>,
}

/// One builder call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOp {
    Where(Lambda),
    Select(Lambda),
    SelectMany(Lambda),
    OrderBy(Lambda),
    OrderByDescending(Lambda),
    ThenBy(Lambda),
    ThenByDescending(Lambda),
    GroupBy(Lambda),
    Skip(Expr),
    Take(Expr),
    Distinct,
    Count(Option<Lambda>),
    LongCount(Option<Lambda>),
    Sum(Option<Lambda>),
    Min(Option<Lambda>),
    Max(Option<Lambda>),
    Average(Option<Lambda>),
    All(Lambda),
    Any(Option<Lambda>),
    Contains(Expr),
    ElementAt(Expr),
    ElementAtOrDefault { index: Expr, default: Literal },
    First(Option<Lambda>),
    FirstOrDefault { predicate: Option<Lambda>, default: Literal },
    Last(Option<Lambda>),
    LastOrDefault { predicate: Option<Lambda>, default: Literal },
    Single(Option<Lambda>),
    SingleOrDefault { predicate: Option<Lambda>, default: Literal },
}

impl QueryOp {
    /// Operations that turn the sequence into a single value. Nothing may follow them.
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            QueryOp::Where(_)
                | QueryOp::Select(_)
                | QueryOp::SelectMany(_)
                | QueryOp::OrderBy(_)
                | QueryOp::OrderByDescending(_)
                | QueryOp::ThenBy(_)
                | QueryOp::ThenByDescending(_)
                | QueryOp::GroupBy(_)
                | QueryOp::Skip(_)
                | QueryOp::Take(_)
                | QueryOp::Distinct
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            QueryOp::Where(_) => "where",
            QueryOp::Select(_) => "select",
            QueryOp::SelectMany(_) => "select_many",
            QueryOp::OrderBy(_) => "order_by",
            QueryOp::OrderByDescending(_) => "order_by_descending",
            QueryOp::ThenBy(_) => "then_by",
            QueryOp::ThenByDescending(_) => "then_by_descending",
            QueryOp::GroupBy(_) => "group_by",
            QueryOp::Skip(_) => "skip",
            QueryOp::Take(_) => "take",
            QueryOp::Distinct => "distinct",
            QueryOp::Count(_) => "count",
            QueryOp::LongCount(_) => "long_count",
            QueryOp::Sum(_) => "sum",
            QueryOp::Min(_) => "min",
            QueryOp::Max(_) => "max",
            QueryOp::Average(_) => "average",
            QueryOp::All(_) => "all",
            QueryOp::Any(_) => "any",
            QueryOp::Contains(_) => "contains",
            QueryOp::ElementAt(_) => "element_at",
            QueryOp::ElementAtOrDefault { .. } => "element_at_or_default",
            QueryOp::First(_) => "first",
            QueryOp::FirstOrDefault { .. } => "first_or_default",
            QueryOp::Last(_) => "last",
            QueryOp::LastOrDefault { .. } => "last_or_default",
            QueryOp::Single(_) => "single",
            QueryOp::SingleOrDefault { .. } => "single_or_default",
        }
    }
}

/// A composed query: a root collection and the operations applied to it.
///
/// ```
/// use surql_translate::query_builder::Query;
///
/// let query = Query::from_table("post")
///     .filter(|p| p.member("Status").eq("DRAFT"))
///     .order_by_descending(|p| p.member("CreatedAt"))
///     .take(5);
/// assert_eq!(query.operations.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub root: QueryRoot,
    #[serde(default)]
    pub operations: Vec<QueryOp>,
}

impl Query {
    /// Query over `table`, resolved against whichever provider translates it.
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            root: QueryRoot {
                table: table.into(),
                catalog: None,
            },
            operations: Vec::new(),
        }
    }

    pub(crate) fn bound(table: impl Into<String>, catalog: CatalogId) -> Self {
        let mut query = Self::from_table(table);
        query.root.catalog = Some(catalog);
        query
    }

    /// Append an operation as-is.
    pub fn with_operation(mut self, op: QueryOp) -> Self {
        self.operations.push(op);
        self
    }

    pub fn filter<F: FnOnce(Expr) -> Expr>(self, predicate: F) -> Self {
        self.with_operation(QueryOp::Where(Lambda::build(predicate)))
    }

    pub fn select<F: FnOnce(Expr) -> Expr>(self, selector: F) -> Self {
        self.with_operation(QueryOp::Select(Lambda::build(selector)))
    }

    pub fn select_many<F: FnOnce(Expr) -> Expr>(self, selector: F) -> Self {
        self.with_operation(QueryOp::SelectMany(Lambda::build(selector)))
    }

    pub fn order_by<F: FnOnce(Expr) -> Expr>(self, key: F) -> Self {
        self.with_operation(QueryOp::OrderBy(Lambda::build(key)))
    }

    pub fn order_by_descending<F: FnOnce(Expr) -> Expr>(self, key: F) -> Self {
        self.with_operation(QueryOp::OrderByDescending(Lambda::build(key)))
    }

    pub fn then_by<F: FnOnce(Expr) -> Expr>(self, key: F) -> Self {
        self.with_operation(QueryOp::ThenBy(Lambda::build(key)))
    }

    pub fn then_by_descending<F: FnOnce(Expr) -> Expr>(self, key: F) -> Self {
        self.with_operation(QueryOp::ThenByDescending(Lambda::build(key)))
    }

    pub fn group_by<F: FnOnce(Expr) -> Expr>(self, key: F) -> Self {
        self.with_operation(QueryOp::GroupBy(Lambda::build(key)))
    }

    pub fn skip(self, count: impl Into<Expr>) -> Self {
        self.with_operation(QueryOp::Skip(count.into()))
    }

    pub fn take(self, count: impl Into<Expr>) -> Self {
        self.with_operation(QueryOp::Take(count.into()))
    }

    pub fn distinct(self) -> Self {
        self.with_operation(QueryOp::Distinct)
    }

    pub fn count(self) -> Self {
        self.with_operation(QueryOp::Count(None))
    }

    pub fn count_where<F: FnOnce(Expr) -> Expr>(self, predicate: F) -> Self {
        self.with_operation(QueryOp::Count(Some(Lambda::build(predicate))))
    }

    pub fn long_count(self) -> Self {
        self.with_operation(QueryOp::LongCount(None))
    }

    pub fn long_count_where<F: FnOnce(Expr) -> Expr>(self, predicate: F) -> Self {
        self.with_operation(QueryOp::LongCount(Some(Lambda::build(predicate))))
    }

    pub fn sum(self) -> Self {
        self.with_operation(QueryOp::Sum(None))
    }

    pub fn sum_by<F: FnOnce(Expr) -> Expr>(self, selector: F) -> Self {
        self.with_operation(QueryOp::Sum(Some(Lambda::build(selector))))
    }

    pub fn min(self) -> Self {
        self.with_operation(QueryOp::Min(None))
    }

    pub fn min_by<F: FnOnce(Expr) -> Expr>(self, selector: F) -> Self {
        self.with_operation(QueryOp::Min(Some(Lambda::build(selector))))
    }

    pub fn max(self) -> Self {
        self.with_operation(QueryOp::Max(None))
    }

    pub fn max_by<F: FnOnce(Expr) -> Expr>(self, selector: F) -> Self {
        self.with_operation(QueryOp::Max(Some(Lambda::build(selector))))
    }

    pub fn average(self) -> Self {
        self.with_operation(QueryOp::Average(None))
    }

    pub fn average_by<F: FnOnce(Expr) -> Expr>(self, selector: F) -> Self {
        self.with_operation(QueryOp::Average(Some(Lambda::build(selector))))
    }

    pub fn all<F: FnOnce(Expr) -> Expr>(self, predicate: F) -> Self {
        self.with_operation(QueryOp::All(Lambda::build(predicate)))
    }

    pub fn any(self) -> Self {
        self.with_operation(QueryOp::Any(None))
    }

    pub fn any_where<F: FnOnce(Expr) -> Expr>(self, predicate: F) -> Self {
        self.with_operation(QueryOp::Any(Some(Lambda::build(predicate))))
    }

    pub fn contains(self, value: impl Into<Expr>) -> Self {
        self.with_operation(QueryOp::Contains(value.into()))
    }

    pub fn element_at(self, index: impl Into<Expr>) -> Self {
        self.with_operation(QueryOp::ElementAt(index.into()))
    }

    pub fn element_at_or_default(self, index: impl Into<Expr>, default: impl Into<Literal>) -> Self {
        self.with_operation(QueryOp::ElementAtOrDefault {
            index: index.into(),
            default: default.into(),
        })
    }

    pub fn first(self) -> Self {
        self.with_operation(QueryOp::First(None))
    }

    pub fn first_where<F: FnOnce(Expr) -> Expr>(self, predicate: F) -> Self {
        self.with_operation(QueryOp::First(Some(Lambda::build(predicate))))
    }

    pub fn first_or_default(self, default: impl Into<Literal>) -> Self {
        self.with_operation(QueryOp::FirstOrDefault {
            predicate: None,
            default: default.into(),
        })
    }

    pub fn first_or_default_where<F: FnOnce(Expr) -> Expr>(
        self,
        predicate: F,
        default: impl Into<Literal>,
    ) -> Self {
        self.with_operation(QueryOp::FirstOrDefault {
            predicate: Some(Lambda::build(predicate)),
            default: default.into(),
        })
    }

    pub fn last(self) -> Self {
        self.with_operation(QueryOp::Last(None))
    }

    pub fn last_where<F: FnOnce(Expr) -> Expr>(self, predicate: F) -> Self {
        self.with_operation(QueryOp::Last(Some(Lambda::build(predicate))))
    }

    pub fn last_or_default(self, default: impl Into<Literal>) -> Self {
        self.with_operation(QueryOp::LastOrDefault {
            predicate: None,
            default: default.into(),
        })
    }

    pub fn last_or_default_where<F: FnOnce(Expr) -> Expr>(
        self,
        predicate: F,
        default: impl Into<Literal>,
    ) -> Self {
        self.with_operation(QueryOp::LastOrDefault {
            predicate: Some(Lambda::build(predicate)),
            default: default.into(),
        })
    }

    pub fn single(self) -> Self {
        self.with_operation(QueryOp::Single(None))
    }

    pub fn single_where<F: FnOnce(Expr) -> Expr>(self, predicate: F) -> Self {
        self.with_operation(QueryOp::Single(Some(Lambda::build(predicate))))
    }

    pub fn single_or_default(self, default: impl Into<Literal>) -> Self {
        self.with_operation(QueryOp::SingleOrDefault {
            predicate: None,
            default: default.into(),
        })
    }

    pub fn single_or_default_where<F: FnOnce(Expr) -> Expr>(
        self,
        predicate: F,
        default: impl Into<Literal>,
    ) -> Self {
        self.with_operation(QueryOp::SingleOrDefault {
            predicate: Some(Lambda::build(predicate)),
            default: default.into(),
        })
    }
}
