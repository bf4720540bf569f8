//! Built-in filter kinds
//!
//! - `date_range`: `{field, from?, to?}` as a half-open RFC3339 range
//! - `channel`: `{channels: [uuid, ...]}` restricting `ChannelId`
//! - `equals`: `{field, value}` exact match

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::compat::CHANNEL_ID_FIELD;
use crate::query::FilterDocument;
use crate::store::extended::{date_value, parse_timestamp, uuid_value};

use super::errors::{FilterError, FilterResult};
use super::registry::{FilterRegistry, QueryFilter};
use super::spec::FilterSpec;

pub const DATE_RANGE_KIND: &str = "date_range";
pub const CHANNEL_KIND: &str = "channel";
pub const EQUALS_KIND: &str = "equals";

pub(super) fn register_all(registry: &mut FilterRegistry) {
    registry.register(DATE_RANGE_KIND, |spec: &FilterSpec| {
        Ok(Box::new(DateRangeFilter::from_spec(spec)?) as Box<dyn QueryFilter>)
    });
    registry.register(CHANNEL_KIND, |spec: &FilterSpec| {
        Ok(Box::new(ChannelFilter::from_spec(spec)?) as Box<dyn QueryFilter>)
    });
    registry.register(EQUALS_KIND, |spec: &FilterSpec| {
        Ok(Box::new(EqualsFilter::from_spec(spec)?) as Box<dyn QueryFilter>)
    });
}

fn required_field(spec: &FilterSpec) -> FilterResult<String> {
    match spec.str_param("field") {
        Some(field) if !field.trim().is_empty() => Ok(field.to_string()),
        _ => Err(FilterError::invalid(spec, "field is required")),
    }
}

/// Half-open time range `[from, to)` on a timestamp field
#[derive(Debug, Clone, PartialEq)]
pub struct DateRangeFilter {
    pub field: String,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRangeFilter {
    pub fn from_spec(spec: &FilterSpec) -> FilterResult<Self> {
        let field = required_field(spec)?;
        let bound = |key: &str| -> FilterResult<Option<DateTime<Utc>>> {
            match spec.param(key) {
                None => Ok(None),
                Some(Value::String(s)) => parse_timestamp(s)
                    .map(Some)
                    .ok_or_else(|| FilterError::invalid(spec, format!("{} is not RFC3339: {}", key, s))),
                Some(other) => Err(FilterError::invalid(
                    spec,
                    format!("{} must be a string, got {}", key, other),
                )),
            }
        };
        let from = bound("from")?;
        let to = bound("to")?;

        match (from, to) {
            (None, None) => Err(FilterError::invalid(spec, "from or to is required")),
            (Some(f), Some(t)) if f >= t => {
                Err(FilterError::invalid(spec, "from must be before to"))
            }
            _ => Ok(Self { field, from, to }),
        }
    }
}

impl QueryFilter for DateRangeFilter {
    fn inject_into(&self, document: &mut FilterDocument) {
        let mut ops = Map::new();
        if let Some(from) = self.from {
            ops.insert("$gte".to_string(), date_value(from));
        }
        if let Some(to) = self.to {
            ops.insert("$lt".to_string(), date_value(to));
        }
        document.insert(self.field.clone(), Value::Object(ops));
    }
}

/// Restricts rows to a set of channels
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelFilter {
    pub channels: Vec<Uuid>,
}

impl ChannelFilter {
    pub fn from_spec(spec: &FilterSpec) -> FilterResult<Self> {
        let raw = spec
            .param("channels")
            .and_then(Value::as_array)
            .ok_or_else(|| FilterError::invalid(spec, "channels must be an array"))?;
        if raw.is_empty() {
            return Err(FilterError::invalid(spec, "channels is empty"));
        }

        let channels = raw
            .iter()
            .map(|v| {
                v.as_str()
                    .and_then(|s| Uuid::parse_str(s).ok())
                    .ok_or_else(|| FilterError::invalid(spec, format!("not a channel id: {}", v)))
            })
            .collect::<FilterResult<Vec<_>>>()?;

        Ok(Self { channels })
    }
}

impl QueryFilter for ChannelFilter {
    fn inject_into(&self, document: &mut FilterDocument) {
        let ids: Vec<Value> = self.channels.iter().copied().map(uuid_value).collect();
        let mut ops = Map::new();
        ops.insert("$in".to_string(), Value::Array(ids));
        document.insert(CHANNEL_ID_FIELD, Value::Object(ops));
    }
}

/// Exact match on one field
#[derive(Debug, Clone, PartialEq)]
pub struct EqualsFilter {
    pub field: String,
    pub value: Value,
}

impl EqualsFilter {
    pub fn from_spec(spec: &FilterSpec) -> FilterResult<Self> {
        let field = required_field(spec)?;
        let value = spec
            .parameters
            .get("value")
            .cloned()
            .ok_or_else(|| FilterError::invalid(spec, "value is required"))?;
        Ok(Self { field, value })
    }
}

impl QueryFilter for EqualsFilter {
    fn inject_into(&self, document: &mut FilterDocument) {
        document.insert(self.field.clone(), self.value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inject(filter: &dyn QueryFilter) -> FilterDocument {
        let mut doc = FilterDocument::new();
        filter.inject_into(&mut doc);
        doc
    }

    #[test]
    fn test_date_range_both_bounds() {
        let spec = FilterSpec::new(
            "period",
            DATE_RANGE_KIND,
            json!({"field": "Started", "from": "2024-01-01T00:00:00Z", "to": "2024-02-01T00:00:00+00:00"}),
        );
        let doc = inject(&DateRangeFilter::from_spec(&spec).unwrap());
        assert_eq!(
            doc.get("Started"),
            Some(&json!({
                "$gte": {"$date": "2024-01-01T00:00:00Z"},
                "$lt": {"$date": "2024-02-01T00:00:00Z"}
            }))
        );
    }

    #[test]
    fn test_date_range_open_ended() {
        let spec = FilterSpec::new(
            "since",
            DATE_RANGE_KIND,
            json!({"field": "Started", "from": "2024-01-01T00:00:00Z"}),
        );
        let doc = inject(&DateRangeFilter::from_spec(&spec).unwrap());
        assert_eq!(
            doc.get("Started"),
            Some(&json!({"$gte": {"$date": "2024-01-01T00:00:00Z"}}))
        );
    }

    #[test]
    fn test_date_range_rejects_bad_input() {
        let cases = [
            json!({"from": "2024-01-01T00:00:00Z"}),
            json!({"field": "Started"}),
            json!({"field": "Started", "from": "yesterday"}),
            json!({"field": "Started", "from": 5}),
            json!({"field": "Started", "from": "2024-02-01T00:00:00Z", "to": "2024-01-01T00:00:00Z"}),
        ];
        for params in cases {
            let spec = FilterSpec::new("p", DATE_RANGE_KIND, params);
            assert!(DateRangeFilter::from_spec(&spec).is_err());
        }
    }

    #[test]
    fn test_channel_filter() {
        let id = Uuid::from_u128(7);
        let spec = FilterSpec::new("ch", CHANNEL_KIND, json!({"channels": [id.to_string()]}));
        let doc = inject(&ChannelFilter::from_spec(&spec).unwrap());
        assert_eq!(
            doc.get(CHANNEL_ID_FIELD),
            Some(&json!({"$in": [{"$uuid": id.to_string()}]}))
        );
    }

    #[test]
    fn test_channel_filter_rejects_bad_ids() {
        for params in [json!({"channels": []}), json!({"channels": ["x"]}), json!({})] {
            let spec = FilterSpec::new("ch", CHANNEL_KIND, params);
            assert!(ChannelFilter::from_spec(&spec).is_err());
        }
    }

    #[test]
    fn test_equals_filter_allows_null_value() {
        let spec = FilterSpec::new("eq", EQUALS_KIND, json!({"field": "Queue", "value": null}));
        let doc = inject(&EqualsFilter::from_spec(&spec).unwrap());
        assert_eq!(doc.get("Queue"), Some(&Value::Null));

        let spec = FilterSpec::new("eq", EQUALS_KIND, json!({"field": "Queue"}));
        assert!(EqualsFilter::from_spec(&spec).is_err());
    }
}
