use serde::{Deserialize, Serialize};

/// Precedence groups, weakest first. Only used to decide where parentheses go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingPower {
    Or,
    And,
    Equality,
    Relation,
    AddSub,
    MulDiv,
    Power,
    Cast,
    Range,
    Nullish,
    Unary,
}

/// Vector distance metric used by the KNN operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Distance {
    Chebyshev,
    Cosine,
    Euclidean,
    Hamming,
    Jaccard,
    Manhattan,
    Minkowski(u32),
    Pearson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    // Prefix
    Neg,
    Not,
    // Logical
    Or,
    And,
    Tco,
    Nco,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Inc,
    Dec,
    Ext,
    // Comparison
    Equal,
    Exact,
    NotEqual,
    AllEqual,
    AnyEqual,
    Like,
    NotLike,
    AllLike,
    AnyLike,
    LessThan,
    LessThanOrEqual,
    MoreThan,
    MoreThanOrEqual,
    // Membership
    Contain,
    NotContain,
    ContainAll,
    ContainAny,
    ContainNone,
    Inside,
    NotInside,
    AllInside,
    AnyInside,
    NoneInside,
    Outside,
    Intersects,
    /// Full-text match, `@@` or `@N@` with a match reference.
    Matches(Option<u8>),
    /// Brute-force nearest neighbours, `<|k|>` or `<|k,DISTANCE|>`.
    Knn(u32, Option<Distance>),
    /// Index-backed nearest neighbours, `<|k,ef|>`.
    Ann(u32, u32),
}

impl Operator {
    pub fn binding_power(&self) -> BindingPower {
        match self {
            Operator::Neg | Operator::Not | Operator::Inc | Operator::Dec | Operator::Ext => {
                BindingPower::Unary
            }
            Operator::Or => BindingPower::Or,
            Operator::And => BindingPower::And,
            Operator::Tco | Operator::Nco => BindingPower::Nullish,
            Operator::Add | Operator::Sub => BindingPower::AddSub,
            Operator::Mul | Operator::Div | Operator::Rem => BindingPower::MulDiv,
            Operator::Pow => BindingPower::Power,
            Operator::Equal
            | Operator::Exact
            | Operator::NotEqual
            | Operator::AllEqual
            | Operator::AnyEqual
            | Operator::Like
            | Operator::NotLike
            | Operator::AllLike
            | Operator::AnyLike
            | Operator::LessThan
            | Operator::LessThanOrEqual
            | Operator::MoreThan
            | Operator::MoreThanOrEqual => BindingPower::Equality,
            Operator::Contain
            | Operator::NotContain
            | Operator::ContainAll
            | Operator::ContainAny
            | Operator::ContainNone
            | Operator::Inside
            | Operator::NotInside
            | Operator::AllInside
            | Operator::AnyInside
            | Operator::NoneInside
            | Operator::Outside
            | Operator::Intersects
            | Operator::Matches(_)
            | Operator::Knn(..)
            | Operator::Ann(..) => BindingPower::Relation,
        }
    }

    /// Whether `a op (b op c)` means the same as `(a op b) op c`, so an equal-power
    /// right operand can be printed without parentheses.
    pub fn is_associative(&self) -> bool {
        matches!(self, Operator::Or | Operator::And)
    }
}
