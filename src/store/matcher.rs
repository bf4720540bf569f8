//! Filter document evaluation for the in-memory driver
//!
//! Supported forms, per field path:
//! - `{"f": v}` equality (identifiers and timestamps compared by value)
//! - `{"f": {"$eq"|"$ne"|"$gt"|"$gte"|"$lt"|"$lte": v}}`
//! - `{"f": {"$in"|"$nin": [v, ...]}}`
//! - `{"f": {"$exists": bool}}`
//! - `{"$and": [filter, ...]}`
//!
//! Ordering comparisons never match across types and never match null or
//! missing values. Dotted paths walk nested objects.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::query::{FilterDocument, SortDirection, SortSpec};

use super::errors::{StoreError, StoreResult};
use super::extended::{as_date, as_uuid};

const COMPARISON_OPS: [&str; 6] = ["$eq", "$ne", "$gt", "$gte", "$lt", "$lte"];
const LIST_OPS: [&str; 2] = ["$in", "$nin"];

/// Resolves a dotted path inside a document
pub fn lookup_path<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |current, segment| current.get(segment))
}

/// Returns true for `{"$op": ...}` documents that are not typed values
fn is_operator_document(predicate: &Value) -> bool {
    match predicate {
        Value::Object(map) => {
            !map.is_empty()
                && map.keys().all(|k| k.starts_with('$'))
                && as_uuid(predicate).is_none()
                && as_date(predicate).is_none()
        }
        _ => false,
    }
}

/// Evaluates filter documents against JSON documents
pub struct FilterMatcher;

impl FilterMatcher {
    /// Rejects filters the driver cannot evaluate
    pub fn validate(filter: &FilterDocument) -> StoreResult<()> {
        filter
            .iter()
            .try_for_each(|(key, predicate)| Self::validate_clause(key, predicate))
    }

    fn validate_clause(key: &str, predicate: &Value) -> StoreResult<()> {
        if key == "$and" {
            let clauses = predicate
                .as_array()
                .ok_or_else(|| StoreError::InvalidFilter("$and expects an array".to_string()))?;
            for clause in clauses {
                let map = clause.as_object().ok_or_else(|| {
                    StoreError::InvalidFilter("$and entries must be objects".to_string())
                })?;
                map.iter()
                    .try_for_each(|(k, p)| Self::validate_clause(k, p))?;
            }
            return Ok(());
        }
        if key.starts_with('$') {
            return Err(StoreError::UnsupportedOperator(key.to_string()));
        }

        if !is_operator_document(predicate) {
            return Ok(());
        }
        for (op, operand) in predicate.as_object().into_iter().flatten() {
            match op.as_str() {
                o if COMPARISON_OPS.contains(&o) => {}
                o if LIST_OPS.contains(&o) => {
                    if !operand.is_array() {
                        return Err(StoreError::InvalidFilter(format!(
                            "{} on '{}' expects an array",
                            o, key
                        )));
                    }
                }
                "$exists" => {
                    if !operand.is_boolean() {
                        return Err(StoreError::InvalidFilter(format!(
                            "$exists on '{}' expects a boolean",
                            key
                        )));
                    }
                }
                other => return Err(StoreError::UnsupportedOperator(other.to_string())),
            }
        }
        Ok(())
    }

    /// Checks if a document matches every clause (AND semantics)
    pub fn matches(document: &Value, filter: &FilterDocument) -> bool {
        filter
            .iter()
            .all(|(key, predicate)| Self::matches_clause(document, key, predicate))
    }

    fn matches_map(document: &Value, clauses: &Map<String, Value>) -> bool {
        clauses
            .iter()
            .all(|(key, predicate)| Self::matches_clause(document, key, predicate))
    }

    fn matches_clause(document: &Value, key: &str, predicate: &Value) -> bool {
        if key == "$and" {
            return predicate
                .as_array()
                .map(|clauses| {
                    clauses.iter().all(|clause| {
                        clause
                            .as_object()
                            .map(|map| Self::matches_map(document, map))
                            .unwrap_or(false)
                    })
                })
                .unwrap_or(false);
        }

        let actual = lookup_path(document, key);
        match predicate {
            Value::Object(ops) if is_operator_document(predicate) => ops
                .iter()
                .all(|(op, operand)| Self::matches_op(actual, op, operand)),
            expected => Self::eq_match(actual, expected),
        }
    }

    fn matches_op(actual: Option<&Value>, op: &str, operand: &Value) -> bool {
        match op {
            "$eq" => Self::eq_match(actual, operand),
            "$ne" => !Self::eq_match(actual, operand),
            "$gt" => Self::ordered(actual, operand).map_or(false, Ordering::is_gt),
            "$gte" => Self::ordered(actual, operand).map_or(false, Ordering::is_ge),
            "$lt" => Self::ordered(actual, operand).map_or(false, Ordering::is_lt),
            "$lte" => Self::ordered(actual, operand).map_or(false, Ordering::is_le),
            "$in" => operand
                .as_array()
                .map_or(false, |items| items.iter().any(|e| Self::eq_match(actual, e))),
            "$nin" => operand
                .as_array()
                .map_or(false, |items| !items.iter().any(|e| Self::eq_match(actual, e))),
            "$exists" => operand.as_bool() == Some(actual.is_some()),
            _ => false,
        }
    }

    /// Equality; a null operand also matches a missing field
    fn eq_match(actual: Option<&Value>, expected: &Value) -> bool {
        match actual {
            None => expected.is_null(),
            Some(actual) => Self::values_equal(actual, expected),
        }
    }

    fn values_equal(a: &Value, b: &Value) -> bool {
        if let (Some(x), Some(y)) = (as_uuid(a), as_uuid(b)) {
            return x == y;
        }
        if let (Some(x), Some(y)) = (as_date(a), as_date(b)) {
            return x == y;
        }
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
                (Some(xi), Some(yi)) => xi == yi,
                _ => x.as_f64() == y.as_f64(),
            },
            _ => a == b,
        }
    }

    /// Orders two values of the same comparable kind, `None` otherwise
    fn ordered(actual: Option<&Value>, bound: &Value) -> Option<Ordering> {
        let actual = actual.filter(|v| !v.is_null())?;
        if let (Some(x), Some(y)) = (as_date(actual), as_date(bound)) {
            return Some(x.cmp(&y));
        }
        match (actual, bound) {
            (Value::Number(a), Value::Number(b)) => {
                if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                    return Some(ai.cmp(&bi));
                }
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// Total order used for sorting.
///
/// Missing < null < bool < number < string < timestamp < identifier < other.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: &Value) -> u8 {
        if as_date(v).is_some() {
            return 5;
        }
        if as_uuid(v).is_some() {
            return 6;
        }
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) | Value::Object(_) => 7,
        }
    }

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => {
            let (rx, ry) = (rank(x), rank(y));
            if rx != ry {
                return rx.cmp(&ry);
            }
            match (x, y) {
                (Value::Bool(p), Value::Bool(q)) => p.cmp(q),
                (Value::Number(p), Value::Number(q)) => {
                    let pf = p.as_f64().unwrap_or(0.0);
                    let qf = q.as_f64().unwrap_or(0.0);
                    pf.partial_cmp(&qf).unwrap_or(Ordering::Equal)
                }
                (Value::String(p), Value::String(q)) => p.cmp(q),
                _ => match (as_date(x), as_date(y)) {
                    (Some(p), Some(q)) => p.cmp(&q),
                    _ => match (as_uuid(x), as_uuid(y)) {
                        (Some(p), Some(q)) => p.cmp(&q),
                        _ => Ordering::Equal,
                    },
                },
            }
        }
    }
}

/// Stable multi-key sort of documents
pub fn sort_documents(documents: &mut [Value], sort: &SortSpec) {
    documents.sort_by(|a, b| {
        sort.iter()
            .map(|key| {
                let ordering =
                    compare_values(lookup_path(a, &key.field), lookup_path(b, &key.field));
                match key.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            })
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}
