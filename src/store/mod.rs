//! Document store boundary
//!
//! The retrieval pipeline talks to the store only through `DocumentStore`,
//! `CollectionHandle` and `DocumentCursor`. `MemoryStore` is a complete
//! in-process driver used by the CLI and the test suites.

mod driver;
mod errors;
pub mod extended;
mod matcher;
mod memory;

pub use driver::{CollectionHandle, DocumentCursor, DocumentStore};
pub use errors::{StoreError, StoreResult};
pub use matcher::{compare_values, lookup_path, sort_documents, FilterMatcher};
pub use memory::{MemoryCollection, MemoryCursor, MemoryStore};
