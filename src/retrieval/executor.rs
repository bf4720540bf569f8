//! Query execution against the store
//!
//! Cursor narrowing happens in a fixed order, which some backends depend on:
//! 1. Open a cursor over the collection scoped by the filter
//! 2. Restrict to the projection fields
//! 3. Apply the sort (if any)
//! 4. Apply skip (always, including zero)
//! 5. Apply limit (only when bounded; the sentinel never reaches the store)

use crate::query::{FilterDocument, SortSpec, UNBOUNDED_LIMIT};
use crate::store::{DocumentCursor, DocumentStore};

use super::errors::{RetrievalError, RetrievalResult};

/// Opens and narrows store cursors
pub struct QueryExecutor;

impl QueryExecutor {
    /// Returns a lazy cursor; nothing is read until it is iterated.
    pub fn execute(
        store: &dyn DocumentStore,
        collection_name: &str,
        filter: &FilterDocument,
        fields: &[String],
        sort: Option<&SortSpec>,
        skip: u64,
        limit: i64,
    ) -> RetrievalResult<Box<dyn DocumentCursor>> {
        let limit = match limit {
            UNBOUNDED_LIMIT => None,
            n => Some(u64::try_from(n).map_err(|_| {
                RetrievalError::invalid_request(format!("invalid limit {}", n))
            })?),
        };

        let collection = store.open_collection(collection_name)?;
        let mut cursor = collection.find(filter)?;

        cursor.set_projection(fields)?;
        if let Some(sort) = sort.filter(|s| !s.is_empty()) {
            cursor.set_sort(sort)?;
        }
        cursor.set_skip(skip)?;
        if let Some(limit) = limit {
            cursor.set_limit(limit)?;
        }

        Ok(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortKey;
    use crate::store::{CollectionHandle, StoreResult};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};

    type CallLog = Arc<Mutex<Vec<String>>>;

    /// Store that records every driver call
    struct RecordingStore {
        calls: CallLog,
    }

    struct RecordingCollection {
        name: String,
        calls: CallLog,
    }

    struct RecordingCursor {
        calls: CallLog,
    }

    impl DocumentStore for RecordingStore {
        fn open_collection(&self, name: &str) -> StoreResult<Box<dyn CollectionHandle>> {
            self.calls.lock().unwrap().push(format!("open:{}", name));
            Ok(Box::new(RecordingCollection {
                name: name.to_string(),
                calls: Arc::clone(&self.calls),
            }))
        }
    }

    impl CollectionHandle for RecordingCollection {
        fn name(&self) -> &str {
            &self.name
        }

        fn find(&self, filter: &FilterDocument) -> StoreResult<Box<dyn DocumentCursor>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("find:{}", filter.to_value()));
            Ok(Box::new(RecordingCursor {
                calls: Arc::clone(&self.calls),
            }))
        }
    }

    impl Iterator for RecordingCursor {
        type Item = StoreResult<Value>;

        fn next(&mut self) -> Option<Self::Item> {
            None
        }
    }

    impl DocumentCursor for RecordingCursor {
        fn set_projection(&mut self, fields: &[String]) -> StoreResult<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("projection:{}", fields.join(",")));
            Ok(())
        }

        fn set_sort(&mut self, sort: &SortSpec) -> StoreResult<()> {
            let keys: Vec<String> = sort
                .iter()
                .map(|k| format!("{} {}", k.field, k.direction.as_str()))
                .collect();
            self.calls
                .lock()
                .unwrap()
                .push(format!("sort:{}", keys.join(",")));
            Ok(())
        }

        fn set_skip(&mut self, skip: u64) -> StoreResult<()> {
            self.calls.lock().unwrap().push(format!("skip:{}", skip));
            Ok(())
        }

        fn set_limit(&mut self, limit: u64) -> StoreResult<()> {
            self.calls.lock().unwrap().push(format!("limit:{}", limit));
            Ok(())
        }
    }

    fn run(sort: Option<&SortSpec>, skip: u64, limit: i64) -> RetrievalResult<Vec<String>> {
        let calls = CallLog::default();
        let store = RecordingStore {
            calls: Arc::clone(&calls),
        };
        let fields = vec!["a".to_string(), "b".to_string()];
        QueryExecutor::execute(&store, "c", &FilterDocument::new(), &fields, sort, skip, limit)?;
        let log = calls.lock().unwrap().clone();
        Ok(log)
    }

    #[test]
    fn test_fixed_application_order() {
        let sort = SortSpec::new(vec![SortKey::desc("a")]);
        assert_eq!(
            run(Some(&sort), 10, 5).unwrap(),
            vec!["open:c", "find:{}", "projection:a,b", "sort:a desc", "skip:10", "limit:5"]
        );
    }

    #[test]
    fn test_unbounded_limit_not_forwarded_and_zero_skip_applied() {
        assert_eq!(
            run(None, 0, UNBOUNDED_LIMIT).unwrap(),
            vec!["open:c", "find:{}", "projection:a,b", "skip:0"]
        );
    }

    #[test]
    fn test_zero_limit_forwarded() {
        let log = run(None, 0, 0).unwrap();
        assert_eq!(log.last().map(String::as_str), Some("limit:0"));
    }

    #[test]
    fn test_invalid_limit_rejected_before_store() {
        let calls = CallLog::default();
        let store = RecordingStore {
            calls: Arc::clone(&calls),
        };
        let result = QueryExecutor::execute(&store, "c", &FilterDocument::new(), &[], None, 0, -7);
        assert!(matches!(result, Err(RetrievalError::InvalidRequest(_))));
        assert!(calls.lock().unwrap().is_empty());
    }
}
