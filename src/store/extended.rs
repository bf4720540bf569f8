//! Extended JSON forms for typed values stored in documents
//!
//! Identifiers are `{"$uuid": "<hyphenated>"}`, timestamps are
//! `{"$date": "<RFC3339>"}`. Plain JSON values are left as they are.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Key marking an identifier value
pub const UUID_KEY: &str = "$uuid";

/// Key marking a timestamp value
pub const DATE_KEY: &str = "$date";

/// Encodes an identifier
pub fn uuid_value(id: Uuid) -> Value {
    tagged(UUID_KEY, id.hyphenated().to_string())
}

/// Encodes a timestamp at second precision
pub fn date_value(at: DateTime<Utc>) -> Value {
    tagged(DATE_KEY, at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn tagged(key: &str, text: String) -> Value {
    let mut map = Map::with_capacity(1);
    map.insert(key.to_string(), Value::String(text));
    Value::Object(map)
}

fn single_entry<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get(key)?.as_str()
}

/// Decodes an identifier, `None` if the value is not one
pub fn as_uuid(value: &Value) -> Option<Uuid> {
    single_entry(value, UUID_KEY).and_then(|s| Uuid::parse_str(s).ok())
}

/// Decodes a timestamp, `None` if the value is not one
pub fn as_date(value: &Value) -> Option<DateTime<Utc>> {
    single_entry(value, DATE_KEY).and_then(parse_timestamp)
}

/// Parses an RFC3339 string into UTC
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}
