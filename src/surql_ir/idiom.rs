use super::value::Value;

/// One step of a field path.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Leading computed value, e.g. a subquery or a `$param`.
    Start(Value),
    /// `$parent`, one hop up the correlation chain.
    Parent,
    Field(String),
    Index(i64),
    All,
    First,
    Last,
    Where(Value),
    Flatten,
    Optional,
    Doc,
    Method(String, Vec<Value>),
    /// Computed index, `[value]`.
    Value(Value),
}

/// A field path such as `Address.City`, `$parent.id` or `(SELECT ...)[0].Values`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Idiom(pub Vec<Part>);

impl Idiom {
    pub fn field(name: impl Into<String>) -> Self {
        Idiom(vec![Part::Field(name.into())])
    }

    /// `$parent` repeated `hops` times.
    pub fn parents(hops: usize) -> Self {
        Idiom(vec![Part::Parent; hops])
    }

    pub fn start(value: Value) -> Self {
        Idiom(vec![Part::Start(value)])
    }

    pub fn push(mut self, part: Part) -> Self {
        self.0.push(part);
        self
    }

    pub fn parts(&self) -> &[Part] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name of the path when it is a single bare field access.
    pub fn as_single_field(&self) -> Option<&str> {
        match self.0.as_slice() {
            [Part::Field(name)] => Some(name),
            _ => None,
        }
    }

    /// True when the path starts at the current document (first part is a field).
    pub fn is_row_rooted(&self) -> bool {
        matches!(self.0.first(), None | Some(Part::Field(_)))
    }

    /// Two idioms are the same when every part is a field access and the names
    /// match pairwise.
    pub fn is_same(&self, other: &Idiom) -> bool {
        self.0.len() == other.0.len()
            && self.0.iter().zip(other.0.iter()).all(|(a, b)| match (a, b) {
                (Part::Field(a), Part::Field(b)) => a == b,
                _ => false,
            })
    }

    /// Prefixes the path with `hops` `$parent` steps.
    pub fn reparent(self, hops: usize) -> Self {
        if hops == 0 {
            return self;
        }
        let mut parts = vec![Part::Parent; hops];
        parts.extend(self.0);
        Idiom(parts)
    }
}

impl From<Vec<Part>> for Idiom {
    fn from(parts: Vec<Part>) -> Self {
        Idiom(parts)
    }
}
