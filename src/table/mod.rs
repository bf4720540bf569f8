//! Tabular results
//!
//! Rows are materialized from a store cursor into a `ResultTable` whose
//! columns follow the requested field order.

mod materializer;
mod result;
mod value;

pub use materializer::{JsonTableMaterializer, TableMaterializer};
pub use result::{ResultRow, ResultTable, TableError};
pub use value::CellValue;
