//! Store driver boundary
//!
//! The data source reads through these traits only. A driver hands out a
//! collection handle, the handle opens a cursor scoped by a filter, and the
//! cursor is narrowed (projection, sort, skip, limit) before it is read.
//!
//! Cursors are forward-only and not restartable. Dropping a cursor releases
//! it, whether or not it was read to the end.

use serde_json::Value;

use crate::query::{FilterDocument, SortSpec};

use super::errors::StoreResult;

/// Entry point of a document store driver
pub trait DocumentStore: Send + Sync {
    /// Opens a handle on a collection
    fn open_collection(&self, name: &str) -> StoreResult<Box<dyn CollectionHandle>>;
}

/// Handle on one collection
pub trait CollectionHandle: Send {
    /// Collection name
    fn name(&self) -> &str;

    /// Opens a cursor over documents matching `filter`
    fn find(&self, filter: &FilterDocument) -> StoreResult<Box<dyn DocumentCursor>>;
}

/// Lazy cursor over matched documents.
///
/// Options may only be set before the first call to `next`.
pub trait DocumentCursor: Iterator<Item = StoreResult<Value>> + Send {
    /// Restricts returned documents to `fields`
    fn set_projection(&mut self, fields: &[String]) -> StoreResult<()>;

    /// Orders matched documents
    fn set_sort(&mut self, sort: &SortSpec) -> StoreResult<()>;

    /// Skips the first `skip` matched documents
    fn set_skip(&mut self, skip: u64) -> StoreResult<()>;

    /// Returns at most `limit` documents
    fn set_limit(&mut self, limit: u64) -> StoreResult<()>;
}
