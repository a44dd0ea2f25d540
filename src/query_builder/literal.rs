use std::time::Duration;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::surql_ir::{Geometry, RecordId, RecordKey};

lazy_static! {
    static ref DECIMAL: Regex = Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").unwrap();
}

/// A host value, either inlined into the query or bound as a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    None,
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    /// Exact decimal digits, see [`Literal::decimal`].
    Decimal(String),
    Char(char),
    String(String),
    Duration(Duration),
    DateTime(DateTime<Utc>),
    Uuid(Uuid),
    Array(Vec<Literal>),
    Object(IndexMap<String, Literal>),
    Geometry(Geometry),
    RecordId(RecordId),
    Regex(String),
}

impl Literal {
    /// Decimal literal from its textual digits, `None` when `digits` is not a plain decimal.
    pub fn decimal(digits: impl Into<String>) -> Option<Self> {
        let digits = digits.into();
        if is_decimal(&digits) {
            Some(Literal::Decimal(digits))
        } else {
            None
        }
    }

    pub fn record_id(table: impl Into<String>, key: impl Into<String>) -> Self {
        Literal::RecordId(RecordId::new(table, RecordKey::String(key.into())))
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Literal)>) -> Self {
        Literal::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Plain JSON form, used when parameters are handed to a transport or printed.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Literal::None | Literal::Null => Json::Null,
            Literal::Bool(b) => Json::Bool(*b),
            Literal::Int32(v) => Json::from(*v),
            Literal::Int64(v) => Json::from(*v),
            Literal::Float32(v) => Json::from(*v as f64),
            Literal::Float64(v) => Json::from(*v),
            Literal::Decimal(v) => Json::String(v.clone()),
            Literal::Char(c) => Json::String(c.to_string()),
            Literal::String(s) | Literal::Regex(s) => Json::String(s.clone()),
            Literal::Duration(d) => Json::String(crate::surql_generator::literals::format_duration(d)),
            Literal::DateTime(d) => Json::String(d.to_rfc3339()),
            Literal::Uuid(u) => Json::String(u.to_string()),
            Literal::Array(items) => Json::Array(items.iter().map(Literal::to_json).collect()),
            Literal::Object(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Literal::Geometry(g) => serde_json::to_value(g).unwrap_or(Json::Null),
            Literal::RecordId(id) => {
                let key = match &id.key {
                    RecordKey::Number(n) => n.to_string(),
                    RecordKey::String(s) => s.clone(),
                    RecordKey::Uuid(u) => u.to_string(),
                };
                Json::String(format!("{}:{}", id.table, key))
            }
        }
    }
}

pub fn is_decimal(digits: &str) -> bool {
    DECIMAL.is_match(digits)
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Int32(v)
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int64(v)
    }
}

impl From<f32> for Literal {
    fn from(v: f32) -> Self {
        Literal::Float32(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float64(v)
    }
}

impl From<char> for Literal {
    fn from(v: char) -> Self {
        Literal::Char(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

impl From<Duration> for Literal {
    fn from(v: Duration) -> Self {
        Literal::Duration(v)
    }
}

impl From<DateTime<Utc>> for Literal {
    fn from(v: DateTime<Utc>) -> Self {
        Literal::DateTime(v)
    }
}

impl From<Uuid> for Literal {
    fn from(v: Uuid) -> Self {
        Literal::Uuid(v)
    }
}

impl From<RecordId> for Literal {
    fn from(v: RecordId) -> Self {
        Literal::RecordId(v)
    }
}

impl From<Geometry> for Literal {
    fn from(v: Geometry) -> Self {
        Literal::Geometry(v)
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Literal::Null)
    }
}

impl<T: Into<Literal>> From<Vec<T>> for Literal {
    fn from(v: Vec<T>) -> Self {
        Literal::Array(v.into_iter().map(Into::into).collect())
    }
}
