//! Dynamically typed cell values

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::store::extended::{as_date, as_uuid};

/// One cell of a result row
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Identifier(Uuid),
    Timestamp(DateTime<Utc>),
    /// Nested object or array, kept as read
    Document(Value),
}

impl CellValue {
    /// Decodes a stored JSON value, recognising extended identifier and
    /// timestamp forms
    pub fn from_json(value: &Value) -> Self {
        if let Some(id) = as_uuid(value) {
            return CellValue::Identifier(id);
        }
        if let Some(at) = as_date(value) {
            return CellValue::Timestamp(at);
        }
        match value {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => CellValue::Document(value.clone()),
        }
    }

    /// Renders the value as plain JSON for callers
    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Null => Value::Null,
            CellValue::Bool(b) => Value::Bool(*b),
            CellValue::Int(i) => Value::from(*i),
            CellValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Identifier(id) => Value::String(id.hyphenated().to_string()),
            CellValue::Timestamp(at) => {
                Value::String(at.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            CellValue::Document(v) => v.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// True for null, the nil identifier and blank text
    pub fn is_empty_identifier(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Identifier(id) => id.is_nil(),
            CellValue::Text(s) => {
                let s = s.trim();
                s.is_empty() || Uuid::parse_str(s).map_or(false, |id| id.is_nil())
            }
            _ => false,
        }
    }

    /// Reads the value as an integer code.
    ///
    /// Accepts integers, integral floats and numeric text.
    pub fn as_integer_code(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                let f = *f;
                if f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    Some(f as i64)
                } else {
                    None
                }
            }
            CellValue::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<Uuid> for CellValue {
    fn from(id: Uuid) -> Self {
        CellValue::Identifier(id)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}
