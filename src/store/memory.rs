//! In-memory document store
//!
//! Reference driver for tests and the CLI. Collections are vectors of JSON
//! documents in insertion order; a missing collection reads as empty.
//! Cursors evaluate lazily on first read and keep a snapshot of the
//! collection taken at `find`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::{Map, Value};

use crate::query::{FilterDocument, SortSpec};

use super::driver::{CollectionHandle, DocumentCursor, DocumentStore};
use super::errors::{StoreError, StoreResult};
use super::matcher::{lookup_path, sort_documents, FilterMatcher};

type Collections = HashMap<String, Arc<Vec<Value>>>;

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a dataset of the form `{"collection": [document, ...], ...}`
    pub fn from_dataset(dataset: Value) -> StoreResult<Self> {
        let collections = match dataset {
            Value::Object(map) => map,
            _ => {
                return Err(StoreError::MalformedDocument {
                    collection: String::new(),
                    reason: "dataset must be an object of collections".to_string(),
                })
            }
        };

        let store = Self::new();
        for (name, documents) in collections {
            match documents {
                Value::Array(docs) => store.insert_many(&name, docs)?,
                _ => {
                    return Err(StoreError::MalformedDocument {
                        collection: name,
                        reason: "collection must be an array".to_string(),
                    })
                }
            }
        }
        Ok(store)
    }

    /// Appends one document
    pub fn insert(&self, collection: &str, document: Value) -> StoreResult<()> {
        self.insert_many(collection, vec![document])
    }

    /// Appends documents in order; every document must be an object
    pub fn insert_many(&self, collection: &str, documents: Vec<Value>) -> StoreResult<()> {
        if let Some(bad) = documents.iter().find(|d| !d.is_object()) {
            return Err(StoreError::MalformedDocument {
                collection: collection.to_string(),
                reason: format!("expected an object, got {}", bad),
            });
        }

        let mut collections = self
            .collections
            .write()
            .map_err(|_| StoreError::driver("collection lock poisoned"))?;
        let entry = collections.entry(collection.to_string()).or_default();
        Arc::make_mut(entry).extend(documents);
        Ok(())
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, |docs| docs.len()))
            .unwrap_or(0)
    }

    /// Number of cursors opened and not yet dropped
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }
}

impl DocumentStore for MemoryStore {
    fn open_collection(&self, name: &str) -> StoreResult<Box<dyn CollectionHandle>> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StoreError::driver("collection lock poisoned"))?;
        let documents = collections.get(name).cloned().unwrap_or_default();

        Ok(Box::new(MemoryCollection {
            name: name.to_string(),
            documents,
            open_cursors: Arc::clone(&self.open_cursors),
        }))
    }
}

/// Snapshot handle on one collection
pub struct MemoryCollection {
    name: String,
    documents: Arc<Vec<Value>>,
    open_cursors: Arc<AtomicUsize>,
}

impl CollectionHandle for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn find(&self, filter: &FilterDocument) -> StoreResult<Box<dyn DocumentCursor>> {
        FilterMatcher::validate(filter)?;
        self.open_cursors.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MemoryCursor {
            documents: Arc::clone(&self.documents),
            filter: filter.clone(),
            projection: None,
            sort: None,
            skip: 0,
            limit: None,
            pending: None,
            open_cursors: Arc::clone(&self.open_cursors),
        }))
    }
}

/// Lazy cursor over a collection snapshot
pub struct MemoryCursor {
    documents: Arc<Vec<Value>>,
    filter: FilterDocument,
    projection: Option<Vec<String>>,
    sort: Option<SortSpec>,
    skip: u64,
    limit: Option<u64>,
    pending: Option<std::vec::IntoIter<Value>>,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryCursor {
    fn ensure_not_started(&self, option: &'static str) -> StoreResult<()> {
        if self.pending.is_some() {
            return Err(StoreError::CursorStarted(option));
        }
        Ok(())
    }

    /// Runs the query: filter, sort, skip, limit, project
    fn evaluate(&self) -> Vec<Value> {
        let mut matched: Vec<Value> = self
            .documents
            .iter()
            .filter(|doc| FilterMatcher::matches(doc, &self.filter))
            .cloned()
            .collect();

        if let Some(sort) = &self.sort {
            sort_documents(&mut matched, sort);
        }

        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let limit = self
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|doc| self.project(doc))
            .collect()
    }

    fn project(&self, document: Value) -> Value {
        let Some(fields) = &self.projection else {
            return document;
        };
        let mut projected = Map::with_capacity(fields.len());
        for field in fields {
            if let Some(value) = lookup_path(&document, field) {
                insert_path(&mut projected, field, value.clone());
            }
        }
        Value::Object(projected)
    }
}

/// Writes `value` at a dotted path, creating intermediate objects.
///
/// A non-object already sitting on the path is left as it is.
fn insert_path(target: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            target.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(child) = child {
                insert_path(child, rest, value);
            }
        }
    }
}

impl Iterator for MemoryCursor {
    type Item = StoreResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending.is_none() {
            self.pending = Some(self.evaluate().into_iter());
        }
        self.pending.as_mut()?.next().map(Ok)
    }
}

impl DocumentCursor for MemoryCursor {
    fn set_projection(&mut self, fields: &[String]) -> StoreResult<()> {
        self.ensure_not_started("projection")?;
        self.projection = Some(fields.to_vec());
        Ok(())
    }

    fn set_sort(&mut self, sort: &SortSpec) -> StoreResult<()> {
        self.ensure_not_started("sort")?;
        self.sort = Some(sort.clone());
        Ok(())
    }

    fn set_skip(&mut self, skip: u64) -> StoreResult<()> {
        self.ensure_not_started("skip")?;
        self.skip = skip;
        Ok(())
    }

    fn set_limit(&mut self, limit: u64) -> StoreResult<()> {
        self.ensure_not_started("limit")?;
        self.limit = Some(limit);
        Ok(())
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        self.open_cursors.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortKey;
    use serde_json::json;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_many(
                "people",
                vec![
                    json!({"name": "c", "age": 30, "city": "x"}),
                    json!({"name": "a", "age": 20, "city": "y"}),
                    json!({"name": "b", "age": 25, "city": "x"}),
                ],
            )
            .unwrap();
        store
    }

    fn names(cursor: Box<dyn DocumentCursor>) -> Vec<String> {
        cursor
            .map(|doc| doc.unwrap()["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_find_natural_order() {
        let store = store();
        let handle = store.open_collection("people").unwrap();
        assert_eq!(handle.name(), "people");
        let cursor = handle
            .find(&FilterDocument::from_value(json!({"city": "x"})).unwrap())
            .unwrap();
        assert_eq!(names(cursor), vec!["c", "b"]);
    }

    #[test]
    fn test_sort_skip_limit_projection() {
        let store = store();
        let handle = store.open_collection("people").unwrap();
        let mut cursor = handle.find(&FilterDocument::new()).unwrap();
        cursor.set_projection(&["name".to_string()]).unwrap();
        cursor.set_sort(&SortSpec::new(vec![SortKey::asc("age")])).unwrap();
        cursor.set_skip(1).unwrap();
        cursor.set_limit(1).unwrap();

        let docs: Vec<Value> = cursor.map(Result::unwrap).collect();
        assert_eq!(docs, vec![json!({"name": "b"})]);
    }

    #[test]
    fn test_dotted_projection_keeps_nesting() {
        let store = MemoryStore::new();
        store
            .insert(
                "people",
                json!({"name": "a", "contact": {"region": "eu", "phone": "1"}, "tags": {"x": 1}}),
            )
            .unwrap();
        let handle = store.open_collection("people").unwrap();
        let mut cursor = handle.find(&FilterDocument::new()).unwrap();
        cursor
            .set_projection(&["contact.region".to_string(), "name".to_string()])
            .unwrap();

        let docs: Vec<Value> = cursor.map(Result::unwrap).collect();
        assert_eq!(docs, vec![json!({"contact": {"region": "eu"}, "name": "a"})]);
        assert_eq!(lookup_path(&docs[0], "contact.region"), Some(&json!("eu")));
    }

    #[test]
    fn test_options_rejected_after_start() {
        let store = store();
        let handle = store.open_collection("people").unwrap();
        let mut cursor = handle.find(&FilterDocument::new()).unwrap();
        assert!(cursor.next().is_some());
        assert_eq!(cursor.set_limit(1), Err(StoreError::CursorStarted("limit")));
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let store = store();
        let handle = store.open_collection("nothing").unwrap();
        assert_eq!(handle.find(&FilterDocument::new()).unwrap().count(), 0);
    }

    #[test]
    fn test_find_rejects_unsupported_filter() {
        let store = store();
        let handle = store.open_collection("people").unwrap();
        let filter = FilterDocument::from_value(json!({"name": {"$regex": "a"}})).unwrap();
        assert!(handle.find(&filter).is_err());
        assert_eq!(store.open_cursors(), 0);
    }

    #[test]
    fn test_cursor_release_tracked() {
        let store = store();
        let handle = store.open_collection("people").unwrap();
        let cursor = handle.find(&FilterDocument::new()).unwrap();
        assert_eq!(store.open_cursors(), 1);
        drop(cursor);
        assert_eq!(store.open_cursors(), 0);
    }

    #[test]
    fn test_snapshot_isolated_from_later_inserts() {
        let store = store();
        let handle = store.open_collection("people").unwrap();
        store.insert("people", json!({"name": "d"})).unwrap();
        assert_eq!(handle.find(&FilterDocument::new()).unwrap().count(), 3);
        assert_eq!(store.count("people"), 4);
    }

    #[test]
    fn test_from_dataset() {
        let store = MemoryStore::from_dataset(json!({"a": [{"x": 1}], "b": []})).unwrap();
        assert_eq!(store.count("a"), 1);
        assert!(MemoryStore::from_dataset(json!([1])).is_err());
        assert!(MemoryStore::from_dataset(json!({"a": [1]})).is_err());
        assert!(MemoryStore::from_dataset(json!({"a": {}})).is_err());
    }
}
