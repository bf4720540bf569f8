//! Query translation
//!
//! Turns query text plus bound parameters into a `NativeQuery`. The data
//! source only depends on the `QueryTranslator` trait; `JsonQueryTranslator`
//! is the reference translator for JSON query documents.
//!
//! # JSON query document
//!
//! ```json
//! {
//!   "collection": "Interactions",
//!   "fields": ["Started", "ChannelId"],
//!   "filter": {"Started": {"$gte": "@from"}},
//!   "sort": [{"field": "Started", "direction": "desc"}],
//!   "skip": 0,
//!   "limit": -1
//! }
//! ```
//!
//! Any string value equal to `@name`, where `name` is a valid parameter
//! name, is replaced by the parameter `name`. Other strings starting with
//! `@` (such as `"@example.com"`) are literals.

use serde::Deserialize;
use serde_json::Value;

use super::errors::{TranslateError, TranslateResult};
use super::native::{FilterDocument, NativeQuery, SortSpec, UNBOUNDED_LIMIT};
use super::request::{is_valid_parameter_name, QueryParameter};

/// Produces a store-native query from query text and parameters
pub trait QueryTranslator: Send + Sync {
    fn parse(&self, query_text: &str, parameters: &[QueryParameter])
        -> TranslateResult<NativeQuery>;
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QueryDocument {
    collection: String,
    fields: Vec<String>,
    #[serde(default)]
    filter: Value,
    #[serde(default)]
    sort: Option<SortSpec>,
    #[serde(default)]
    skip: u64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    UNBOUNDED_LIMIT
}

/// Translator for JSON query documents with `@name` placeholders
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonQueryTranslator;

impl JsonQueryTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Replaces `@name` placeholders in place
    fn bind(value: &mut Value, parameters: &[QueryParameter]) -> TranslateResult<()> {
        match value {
            Value::String(s) => {
                if let Some(name) = s.strip_prefix('@').filter(|n| is_valid_parameter_name(n)) {
                    let bound = parameters
                        .iter()
                        .find(|p| p.name == name)
                        .ok_or_else(|| TranslateError::UnboundParameter(name.to_string()))?;
                    *value = bound.value.clone();
                }
                Ok(())
            }
            Value::Array(items) => items
                .iter_mut()
                .try_for_each(|item| Self::bind(item, parameters)),
            Value::Object(map) => map
                .values_mut()
                .try_for_each(|item| Self::bind(item, parameters)),
            _ => Ok(()),
        }
    }
}

impl QueryTranslator for JsonQueryTranslator {
    fn parse(
        &self,
        query_text: &str,
        parameters: &[QueryParameter],
    ) -> TranslateResult<NativeQuery> {
        let mut raw: Value = serde_json::from_str(query_text)
            .map_err(|e| TranslateError::Malformed(e.to_string()))?;

        Self::bind(&mut raw, parameters)?;

        let doc: QueryDocument =
            serde_json::from_value(raw).map_err(|e| TranslateError::Malformed(e.to_string()))?;

        let mut query = NativeQuery::new(doc.collection, doc.fields)
            .with_filter(FilterDocument::from_value(doc.filter)?)
            .with_skip(doc.skip)
            .with_limit(doc.limit);
        if let Some(sort) = doc.sort.filter(|s| !s.is_empty()) {
            query = query.with_sort(sort);
        }

        Ok(query)
    }
}
