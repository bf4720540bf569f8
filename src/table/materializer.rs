//! Cursor to table materialization

use crate::store::{lookup_path, DocumentCursor, StoreError, StoreResult};

use super::result::ResultTable;
use super::value::CellValue;

/// Reads a cursor to the end into a table with the given columns
pub trait TableMaterializer: Send + Sync {
    fn to_table(
        &self,
        name: &str,
        fields: &[String],
        cursor: &mut dyn DocumentCursor,
    ) -> StoreResult<ResultTable>;
}

/// Materializer for JSON documents; missing fields become null cells
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTableMaterializer;

impl TableMaterializer for JsonTableMaterializer {
    fn to_table(
        &self,
        name: &str,
        fields: &[String],
        cursor: &mut dyn DocumentCursor,
    ) -> StoreResult<ResultTable> {
        let mut table = ResultTable::new(name, fields.to_vec());

        for document in cursor {
            let document = document?;
            let values = fields
                .iter()
                .map(|field| {
                    lookup_path(&document, field)
                        .map(CellValue::from_json)
                        .unwrap_or(CellValue::Null)
                })
                .collect();
            table
                .push_row(values)
                .map_err(|e| StoreError::driver(e.to_string()))?;
        }

        Ok(table)
    }
}
