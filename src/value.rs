use chrono::{DateTime, Utc};
use std::fmt;

/// Attribute kinds a cell can be inferred as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Number,
    Boolean,
    DateTime,
    List,
    Map,
    Null,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::String => write!(f, "STRING"),
            Kind::Number => write!(f, "NUMBER"),
            Kind::Boolean => write!(f, "BOOLEAN"),
            Kind::DateTime => write!(f, "DATETIME"),
            Kind::List => write!(f, "LIST"),
            Kind::Map => write!(f, "MAP"),
            Kind::Null => write!(f, "NULL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(String),
    Bool(bool),
    DateTime(DateTime<Utc>),
    List(Vec<Value>),
    Map(Vec<(String, Value)>),
    Null,
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::String(_) => Kind::String,
            Value::Number(_) => Kind::Number,
            Value::Bool(_) => Kind::Boolean,
            Value::DateTime(_) => Kind::DateTime,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Null => Kind::Null,
        }
    }
}

/// Infers the most specific value a raw CSV cell can hold.
pub fn infer(cell: &str) -> Value {
    if let Some(b) = parse_bool(cell) {
        return Value::Bool(b);
    }
    if let Some(n) = parse_number(cell) {
        return Value::Number(n);
    }
    if let Some(dt) = parse_datetime(cell) {
        return Value::DateTime(dt);
    }
    if cell.starts_with('{') {
        if let Some(map) = parse_map(cell) {
            return map;
        }
    }
    if cell.starts_with('[') {
        if let Some(list) = parse_list(cell) {
            return list;
        }
    }
    Value::String(cell.to_string())
}

pub fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Returns the textual number if the cell is an integer or a finite decimal.
///
/// Cells with leading zeros (`007`) are identifiers, not numbers.
pub fn parse_number(cell: &str) -> Option<String> {
    let digits = cell.strip_prefix('-').unwrap_or(cell);
    let first = digits.chars().next()?;
    if !first.is_ascii_digit() {
        return None;
    }
    if digits.len() > 1 && first == '0' && !digits[1..].starts_with('.') {
        return None;
    }
    if cell.parse::<i64>().is_ok() {
        return Some(cell.to_string());
    }
    match cell.parse::<f64>() {
        Ok(f) if f.is_finite() => Some(cell.to_string()),
        _ => None,
    }
}

pub fn parse_datetime(cell: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(cell)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn parse_map(cell: &str) -> Option<Value> {
    match serde_json::from_str::<serde_json::Value>(cell) {
        Ok(json @ serde_json::Value::Object(_)) => Some(Value::from(json)),
        _ => None,
    }
}

pub fn parse_list(cell: &str) -> Option<Value> {
    match serde_json::from_str::<serde_json::Value>(cell) {
        Ok(json @ serde_json::Value::Array(_)) => Some(Value::from(json)),
        _ => None,
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Value {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.to_string()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(v) => Value::List(v.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(m) => {
                Value::Map(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> serde_json::Value {
        match value {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Number(n) => n
                .parse()
                .map(serde_json::Value::Number)
                .unwrap_or_else(|_| serde_json::Value::String(n.clone())),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::Null => serde_json::Value::Null,
        }
    }
}
