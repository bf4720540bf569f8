//! Store-native query representation
//!
//! A `NativeQuery` is built fresh for every retrieval and owned by that call
//! alone. Filter injection and field augmentation mutate it in place.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{TranslateError, TranslateResult};

/// Limit sentinel meaning "no limit"
pub const UNBOUNDED_LIMIT: i64 = -1;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// A single sort key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    #[serde(default = "default_direction")]
    pub direction: SortDirection,
}

fn default_direction() -> SortDirection {
    SortDirection::Asc
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Ordered sort specification; earlier keys take precedence
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortSpec {
    pub keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// Appends a key
    pub fn then(mut self, key: SortKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortKey> {
        self.keys.iter()
    }
}

/// Mutable filter document handed to the store.
///
/// Top-level keys are field names (or `$and`) mapped to a value or an
/// operator document. Overwriting an existing key is allowed but recorded so
/// the caller can report it.
#[derive(Debug, Clone, Default)]
pub struct FilterDocument {
    entries: Map<String, Value>,
    overwritten: Vec<String>,
}

impl FilterDocument {
    /// Creates an empty filter document
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing JSON object
    pub fn from_map(entries: Map<String, Value>) -> Self {
        Self {
            entries,
            overwritten: Vec::new(),
        }
    }

    /// Builds a filter document from a JSON value, which must be an object
    pub fn from_value(value: Value) -> TranslateResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            Value::Null => Ok(Self::new()),
            other => Err(TranslateError::InvalidFilter(format!(
                "filter must be an object, got {}",
                other
            ))),
        }
    }

    /// Sets the predicate for a key, returning the previous one if any
    pub fn insert(&mut self, key: impl Into<String>, predicate: Value) -> Option<Value> {
        let key = key.into();
        let previous = self.entries.insert(key.clone(), predicate);
        if previous.is_some() {
            self.overwritten.push(key);
        }
        previous
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Keys overwritten since the last call, in overwrite order
    pub fn take_overwritten(&mut self) -> Vec<String> {
        std::mem::take(&mut self.overwritten)
    }

    /// Returns the document as a JSON object
    pub fn to_value(&self) -> Value {
        Value::Object(self.entries.clone())
    }
}

impl PartialEq for FilterDocument {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// Store-native query produced by translation
#[derive(Debug, Clone, PartialEq)]
pub struct NativeQuery {
    /// Target collection
    pub collection_name: String,
    /// Requested fields, distinct and in request order
    pub fields: Vec<String>,
    /// Filter handed to the store
    pub filter_document: FilterDocument,
    /// Optional sort
    pub sort_spec: Option<SortSpec>,
    /// Rows to skip
    pub skip: u64,
    /// Row limit, `UNBOUNDED_LIMIT` for none
    pub limit: i64,
}

impl NativeQuery {
    /// Creates an unbounded, unsorted query with an empty filter
    pub fn new(collection_name: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            fields,
            filter_document: FilterDocument::new(),
            sort_spec: None,
            skip: 0,
            limit: UNBOUNDED_LIMIT,
        }
    }

    pub fn with_filter(mut self, filter_document: FilterDocument) -> Self {
        self.filter_document = filter_document;
        self
    }

    pub fn with_sort(mut self, sort_spec: SortSpec) -> Self {
        self.sort_spec = Some(sort_spec);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Returns true if the caller asked for `field`
    pub fn requests(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Checks the shape of the query before any store work
    pub fn validate(&self) -> TranslateResult<()> {
        if self.collection_name.trim().is_empty() {
            return Err(TranslateError::InvalidQuery(
                "collection name is empty".to_string(),
            ));
        }
        if self.fields.is_empty() {
            return Err(TranslateError::InvalidQuery("field list is empty".to_string()));
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.trim().is_empty() {
                return Err(TranslateError::InvalidQuery("empty field name".to_string()));
            }
            if !seen.insert(field.as_str()) {
                return Err(TranslateError::InvalidQuery(format!(
                    "duplicate field '{}'",
                    field
                )));
            }
        }

        if self.limit < UNBOUNDED_LIMIT {
            return Err(TranslateError::InvalidQuery(format!(
                "limit must be >= 0 or {}, got {}",
                UNBOUNDED_LIMIT, self.limit
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_document_records_overwrite() {
        let mut doc = FilterDocument::new();
        assert!(doc.insert("a", json!(1)).is_none());
        assert!(doc.insert("b", json!(2)).is_none());
        assert!(doc.take_overwritten().is_empty());

        assert_eq!(doc.insert("a", json!(3)), Some(json!(1)));
        assert_eq!(doc.take_overwritten(), vec!["a".to_string()]);
        assert!(doc.take_overwritten().is_empty());
        assert_eq!(doc.get("a"), Some(&json!(3)));
    }

    #[test]
    fn test_filter_document_from_value() {
        let doc = FilterDocument::from_value(json!({"x": {"$gt": 1}})).unwrap();
        assert_eq!(doc.len(), 1);

        assert!(FilterDocument::from_value(Value::Null).unwrap().is_empty());
        assert!(FilterDocument::from_value(json!([1, 2])).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        assert!(NativeQuery::new("", fields(&["a"])).validate().is_err());
        assert!(NativeQuery::new("c", vec![]).validate().is_err());
        assert!(NativeQuery::new("c", fields(&["a", "a"])).validate().is_err());
        assert!(NativeQuery::new("c", fields(&["a"]))
            .with_limit(-2)
            .validate()
            .is_err());
        assert!(NativeQuery::new("c", fields(&["a", "b"]))
            .with_limit(UNBOUNDED_LIMIT)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_sort_spec_serde() {
        let spec: SortSpec =
            serde_json::from_value(json!([{"field": "a"}, {"field": "b", "direction": "desc"}]))
                .unwrap();
        assert_eq!(spec, SortSpec::default().then(SortKey::asc("a")).then(SortKey::desc("b")));
    }
}
