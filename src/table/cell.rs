use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Number, Value};

use crate::helpers::time::to_epoch_millis;

/// Declared element kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
    #[serde(alias = "date", alias = "timestamp")]
    DateTime,
}

impl ColumnKind {
    /// Numeric kinds keep `null` for missing values instead of an empty string.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float | ColumnKind::Boolean)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Text => "text",
            ColumnKind::DateTime => "datetime",
        }
    }
}

/// One value of a table.
///
/// `Missing` is an absent input value, `Null` an explicit API null.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(DateTime<Utc>),
}

impl Cell {
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Cell::Missing | Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Int(i) => Value::Number((*i).into()),
            Cell::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Cell::Text(s) => Value::String(s.to_owned()),
            Cell::DateTime(dt) => Value::Number(to_epoch_millis(dt).into()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(value: DateTime<Utc>) -> Self {
        Cell::DateTime(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Missing)
    }
}
