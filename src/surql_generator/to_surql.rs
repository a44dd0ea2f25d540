use std::ops::Bound;

use super::errors::SurqlGeneratorError;
use super::escape::{escape_ident, escape_key, escape_record_key, quote_char, quote_str};
use super::literals::{format_datetime, format_duration, format_number};
use crate::surql_ir::{
    BindingPower, Cast, Coordinate, Direction, Distance, Expression, Field, Fields, Function,
    Geometry, Group, Idiom, IfElse, Kind, Operator, Order, Part, Range, RecordId, RecordKey,
    SelectStatement, Value, With,
};

/// Render an IR node as SurrealQL text
pub trait ToSurql {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError>;
}

fn join<T: ToSurql>(items: &[T], separator: &str) -> Result<String, SurqlGeneratorError> {
    let parts: Result<Vec<String>, _> = items.iter().map(|i| i.to_surql()).collect();
    Ok(parts?.join(separator))
}

/// Wraps `value` in parentheses when it binds looser than `threshold`.
fn operand(value: &Value, threshold: BindingPower) -> Result<String, SurqlGeneratorError> {
    let sql = value.to_surql()?;
    match value.binding_power() {
        Some(power) if power < threshold => Ok(format!("({})", sql)),
        _ => Ok(sql),
    }
}

impl ToSurql for SelectStatement {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        if self.what.is_empty() {
            return Err(SurqlGeneratorError::MissingSource);
        }

        let mut sql = String::from("SELECT ");
        sql.push_str(&self.fields.to_surql()?);
        sql.push_str(" FROM ");
        if self.only {
            sql.push_str("ONLY ");
        }
        sql.push_str(&join(&self.what, ", ")?);

        if let Some(with) = &self.with {
            sql.push(' ');
            sql.push_str(&with.to_surql()?);
        }
        if let Some(cond) = &self.cond {
            sql.push_str(" WHERE ");
            sql.push_str(&cond.to_surql()?);
        }
        if !self.split.is_empty() {
            sql.push_str(" SPLIT ");
            sql.push_str(&join(&self.split, ", ")?);
        }
        if let Some(group) = &self.group {
            sql.push(' ');
            sql.push_str(&group.to_surql()?);
        }
        if !self.order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&join(&self.order, ", ")?);
        }
        if let Some(limit) = &self.limit {
            sql.push_str(" LIMIT ");
            sql.push_str(&limit.to_surql()?);
        }
        if let Some(start) = &self.start {
            sql.push_str(" START ");
            sql.push_str(&start.to_surql()?);
        }
        if !self.fetch.is_empty() {
            sql.push_str(" FETCH ");
            sql.push_str(&join(&self.fetch, ", ")?);
        }
        if let Some(explain) = &self.explain {
            sql.push_str(if explain.full {
                " EXPLAIN FULL"
            } else {
                " EXPLAIN"
            });
        }
        Ok(sql)
    }
}

impl ToSurql for Fields {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        if self.items.is_empty() {
            return Err(SurqlGeneratorError::EmptyProjection);
        }
        if self.value {
            if self.items.len() != 1 {
                return Err(SurqlGeneratorError::InvalidValueProjection(self.items.len()));
            }
            return Ok(format!("VALUE {}", self.items[0].expr.to_surql()?));
        }
        join(&self.items, ", ")
    }
}

impl ToSurql for Field {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        let expr = self.expr.to_surql()?;
        match &self.alias {
            Some(alias) => Ok(format!("{} AS {}", expr, alias.to_surql()?)),
            None => Ok(expr),
        }
    }
}

impl ToSurql for With {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        match self {
            With::NoIndex => Ok("WITH NOINDEX".to_string()),
            With::Index(names) => {
                let names: Result<Vec<String>, _> =
                    names.iter().map(|n| escape_ident(n)).collect();
                Ok(format!("WITH INDEX {}", names?.join(", ")))
            }
        }
    }
}

impl ToSurql for Group {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        match self {
            Group::All => Ok("GROUP ALL".to_string()),
            Group::By(idioms) => Ok(format!("GROUP BY {}", join(idioms, ", ")?)),
        }
    }
}

impl ToSurql for Order {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        let value = self.value.to_surql()?;
        match self.direction {
            Direction::Ascending => Ok(value),
            Direction::Descending => Ok(format!("{} DESC", value)),
        }
    }
}

impl ToSurql for Idiom {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        if self.is_empty() {
            return Err(SurqlGeneratorError::EmptyIdiom);
        }
        if let Some(name) = self.as_single_field() {
            return escape_ident(name);
        }

        let mut sql = String::new();
        for (i, part) in self.parts().iter().enumerate() {
            let leading = i == 0;
            match part {
                // Any operator expression must be grouped before a path continues it
                Part::Start(value) => match value.binding_power() {
                    Some(_) => sql.push_str(&format!("({})", value.to_surql()?)),
                    None => sql.push_str(&value.to_surql()?),
                },
                Part::Parent => {
                    if !leading {
                        sql.push('.');
                    }
                    sql.push_str("$parent");
                }
                Part::Field(name) => {
                    if !leading {
                        sql.push('.');
                    }
                    sql.push_str(&escape_ident(name)?);
                }
                Part::Index(index) => sql.push_str(&format!("[{}]", index)),
                Part::All => sql.push_str("[*]"),
                Part::First => sql.push_str("[0]"),
                Part::Last => sql.push_str("[$]"),
                Part::Where(cond) => sql.push_str(&format!("[WHERE {}]", cond.to_surql()?)),
                Part::Flatten => sql.push_str("..."),
                Part::Optional => sql.push('?'),
                Part::Doc => sql.push('@'),
                Part::Method(name, args) => {
                    sql.push_str(&format!(".{}({})", name, join(args, ", ")?));
                }
                Part::Value(value) => sql.push_str(&format!("[{}]", value.to_surql()?)),
            }
        }
        Ok(sql)
    }
}

impl ToSurql for Operator {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        let text = match self {
            Operator::Neg => "-",
            Operator::Not => "!",
            Operator::Or => "||",
            Operator::And => "&&",
            Operator::Tco => "?:",
            Operator::Nco => "??",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
            Operator::Pow => "**",
            Operator::Inc => "+=",
            Operator::Dec => "-=",
            Operator::Ext => "+?=",
            Operator::Equal => "=",
            Operator::Exact => "==",
            Operator::NotEqual => "!=",
            Operator::AllEqual => "*=",
            Operator::AnyEqual => "?=",
            Operator::Like => "~",
            Operator::NotLike => "!~",
            Operator::AllLike => "*~",
            Operator::AnyLike => "?~",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::MoreThan => ">",
            Operator::MoreThanOrEqual => ">=",
            Operator::Contain => "CONTAINS",
            Operator::NotContain => "CONTAINSNOT",
            Operator::ContainAll => "CONTAINSALL",
            Operator::ContainAny => "CONTAINSANY",
            Operator::ContainNone => "CONTAINSNONE",
            Operator::Inside => "INSIDE",
            Operator::NotInside => "NOTINSIDE",
            Operator::AllInside => "ALLINSIDE",
            Operator::AnyInside => "ANYINSIDE",
            Operator::NoneInside => "NONEINSIDE",
            Operator::Outside => "OUTSIDE",
            Operator::Intersects => "INTERSECTS",
            Operator::Matches(None) => "@@",
            Operator::Matches(Some(reference)) => return Ok(format!("@{}@", reference)),
            Operator::Knn(k, None) => return Ok(format!("<|{}|>", k)),
            Operator::Knn(k, Some(distance)) => {
                return Ok(format!("<|{},{}|>", k, distance.to_surql()?))
            }
            Operator::Ann(k, ef) => return Ok(format!("<|{},{}|>", k, ef)),
        };
        Ok(text.to_string())
    }
}

impl ToSurql for Distance {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        Ok(match self {
            Distance::Chebyshev => "CHEBYSHEV".to_string(),
            Distance::Cosine => "COSINE".to_string(),
            Distance::Euclidean => "EUCLIDEAN".to_string(),
            Distance::Hamming => "HAMMING".to_string(),
            Distance::Jaccard => "JACCARD".to_string(),
            Distance::Manhattan => "MANHATTAN".to_string(),
            Distance::Minkowski(order) => format!("MINKOWSKI {}", order),
            Distance::Pearson => "PEARSON".to_string(),
        })
    }
}

impl ToSurql for Expression {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        match self {
            Expression::Unary { o, v } => {
                // Prefix operators always parenthesise a compound operand: !(a || b)
                let operand = match v.binding_power() {
                    Some(power) if power < BindingPower::Unary => format!("({})", v.to_surql()?),
                    _ => v.to_surql()?,
                };
                Ok(format!("{}{}", o.to_surql()?, operand))
            }
            Expression::Binary { l, o, r } => {
                let power = o.binding_power();
                let left = operand(l, power)?;
                let right = match r.binding_power() {
                    Some(p) if p < power || (p == power && !o.is_associative()) => {
                        format!("({})", r.to_surql()?)
                    }
                    _ => r.to_surql()?,
                };
                Ok(format!("{} {} {}", left, o.to_surql()?, right))
            }
        }
    }
}

impl ToSurql for Kind {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        fn tables(name: &str, tables: &[String]) -> Result<String, SurqlGeneratorError> {
            if tables.is_empty() {
                return Ok(name.to_string());
            }
            let tables: Result<Vec<String>, _> = tables.iter().map(|t| escape_ident(t)).collect();
            Ok(format!("{}<{}>", name, tables?.join(" | ")))
        }

        fn collection(
            name: &str,
            kind: &Kind,
            size: &Option<u64>,
        ) -> Result<String, SurqlGeneratorError> {
            match (kind, size) {
                (Kind::Any, None) => Ok(name.to_string()),
                (kind, None) => Ok(format!("{}<{}>", name, kind.to_surql()?)),
                (kind, Some(size)) => Ok(format!("{}<{}, {}>", name, kind.to_surql()?, size)),
            }
        }

        match self {
            Kind::Any => Ok("any".to_string()),
            Kind::Null => Ok("null".to_string()),
            Kind::Bool => Ok("bool".to_string()),
            Kind::Bytes => Ok("bytes".to_string()),
            Kind::Datetime => Ok("datetime".to_string()),
            Kind::Decimal => Ok("decimal".to_string()),
            Kind::Duration => Ok("duration".to_string()),
            Kind::Float => Ok("float".to_string()),
            Kind::Int => Ok("int".to_string()),
            Kind::Number => Ok("number".to_string()),
            Kind::Object => Ok("object".to_string()),
            Kind::String => Ok("string".to_string()),
            Kind::Uuid => Ok("uuid".to_string()),
            Kind::Regex => Ok("regex".to_string()),
            Kind::Record(names) => tables("record", names),
            Kind::Geometry(names) => tables("geometry", names),
            Kind::Option(kind) => Ok(format!("option<{}>", kind.to_surql()?)),
            Kind::Array(kind, size) => collection("array", kind, size),
            Kind::Set(kind, size) => collection("set", kind, size),
        }
    }
}

impl ToSurql for Cast {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        Ok(format!(
            "<{}> {}",
            self.kind.to_surql()?,
            operand(&self.value, BindingPower::Cast)?
        ))
    }
}

impl ToSurql for Function {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        if self.name.is_empty() {
            return Err(SurqlGeneratorError::EmptyIdentifier);
        }
        Ok(format!("{}({})", self.name, join(&self.args, ", ")?))
    }
}

impl ToSurql for Range {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        fn bound(value: &Value) -> Result<String, SurqlGeneratorError> {
            if value.is_static() {
                value.to_surql()
            } else {
                Ok(format!("({})", value.to_surql()?))
            }
        }

        let mut sql = String::new();
        match &self.beg {
            Bound::Included(v) => sql.push_str(&bound(v)?),
            Bound::Excluded(v) => {
                sql.push_str(&bound(v)?);
                sql.push('>');
            }
            Bound::Unbounded => {}
        }
        sql.push_str("..");
        match &self.end {
            Bound::Included(v) => {
                sql.push('=');
                sql.push_str(&bound(v)?);
            }
            Bound::Excluded(v) => sql.push_str(&bound(v)?),
            Bound::Unbounded => {}
        }
        Ok(sql)
    }
}

impl ToSurql for IfElse {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        if self.exprs.is_empty() {
            return Err(SurqlGeneratorError::EmptyConditional);
        }
        let mut sql = String::new();
        for (i, (cond, then)) in self.exprs.iter().enumerate() {
            if i > 0 {
                sql.push_str(" ELSE ");
            }
            sql.push_str(&format!("IF {} THEN {}", cond.to_surql()?, then.to_surql()?));
        }
        if let Some(close) = &self.close {
            sql.push_str(&format!(" ELSE {}", close.to_surql()?));
        }
        sql.push_str(" END");
        Ok(sql)
    }
}

fn coordinate(c: &Coordinate) -> String {
    format!("[{}, {}]", c.0, c.1)
}

fn coordinates(cs: &[Coordinate]) -> String {
    format!("[{}]", cs.iter().map(coordinate).collect::<Vec<_>>().join(", "))
}

fn rings(rs: &[Vec<Coordinate>]) -> String {
    format!(
        "[{}]",
        rs.iter().map(|r| coordinates(r)).collect::<Vec<_>>().join(", ")
    )
}

impl ToSurql for Geometry {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        let body = match self {
            Geometry::Point((x, y)) => return Ok(format!("({}, {})", x, y)),
            Geometry::Line(points) | Geometry::MultiPoint(points) => {
                format!("coordinates: {}", coordinates(points))
            }
            Geometry::Polygon(polygon) | Geometry::MultiLine(polygon) => {
                format!("coordinates: {}", rings(polygon))
            }
            Geometry::MultiPolygon(polygons) => format!(
                "coordinates: [{}]",
                polygons
                    .iter()
                    .map(|p| rings(p))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Geometry::Collection(geometries) => {
                format!("geometries: [{}]", join(geometries, ", ")?)
            }
        };
        Ok(format!(
            "{{ type: {}, {} }}",
            quote_str(self.type_name()),
            body
        ))
    }
}

impl ToSurql for RecordId {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        if self.table.is_empty() {
            return Err(SurqlGeneratorError::EmptyIdentifier);
        }
        let key = match &self.key {
            RecordKey::Number(n) => n.to_string(),
            RecordKey::String(s) => escape_record_key(s),
            RecordKey::Uuid(u) => format!("u\"{}\"", u),
        };
        Ok(format!("{}:{}", escape_record_key(&self.table), key))
    }
}

impl ToSurql for Value {
    fn to_surql(&self) -> Result<String, SurqlGeneratorError> {
        match self {
            Value::None => Ok("NONE".to_string()),
            Value::Null => Ok("null".to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) => Ok(format_number(n)),
            Value::Char(c) => Ok(quote_char(*c)),
            Value::Strand(s) => Ok(quote_str(s)),
            Value::Duration(d) => Ok(format_duration(d)),
            Value::Datetime(d) => Ok(format_datetime(d)),
            Value::Uuid(u) => Ok(format!("u\"{}\"", u)),
            Value::Array(items) => Ok(format!("[{}]", join(items, ", ")?)),
            Value::Object(entries) => {
                if entries.is_empty() {
                    return Ok("{}".to_string());
                }
                let entries: Result<Vec<String>, _> = entries
                    .iter()
                    .map(|(k, v)| {
                        Ok::<_, SurqlGeneratorError>(format!("{}: {}", escape_key(k), v.to_surql()?))
                    })
                    .collect();
                Ok(format!("{{ {} }}", entries?.join(", ")))
            }
            Value::Geometry(g) => g.to_surql(),
            Value::Thing(t) => t.to_surql(),
            Value::Param(name) => {
                if name.is_empty() {
                    return Err(SurqlGeneratorError::EmptyIdentifier);
                }
                Ok(format!("${}", name))
            }
            Value::Idiom(idiom) => idiom.to_surql(),
            Value::Table(name) => escape_ident(name),
            Value::Regex(pattern) => Ok(format!("<regex> {}", quote_str(pattern))),
            Value::Cast(cast) => cast.to_surql(),
            Value::Constant(c) => Ok(c.as_str().to_string()),
            Value::Function(f) => f.to_surql(),
            Value::Subquery(statement) => Ok(format!("({})", statement.to_surql()?)),
            Value::Expression(e) => e.to_surql(),
            Value::Range(r) => r.to_surql(),
            Value::IfElse(i) => i.to_surql(),
        }
    }
}
