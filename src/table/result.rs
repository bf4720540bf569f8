//! Tabular result of a retrieval

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::value::CellValue;

/// Errors raised while building a table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("Row has {found} values, table has {expected} columns")]
    ColumnCountMismatch { expected: usize, found: usize },
}

/// One row; values are aligned with the table's columns
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultRow {
    values: Vec<CellValue>,
}

impl ResultRow {
    pub fn values(&self) -> &[CellValue] {
        &self.values
    }
}

/// Named table with ordered columns and rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<ResultRow>,
}

impl ResultTable {
    /// Creates an empty table
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row
    pub fn push_row(&mut self, values: Vec<CellValue>) -> Result<(), TableError> {
        if values.len() != self.columns.len() {
            return Err(TableError::ColumnCountMismatch {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.rows.push(ResultRow { values });
        Ok(())
    }

    /// Position of a column
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Cell at `row` in the named column
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.values.get(col)
    }

    /// Replaces the cell at (`row`, `col`); returns false if out of range
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.values.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Removes a column from the schema and every row
    pub fn drop_column(&mut self, column: &str) -> bool {
        let Some(col) = self.column_index(column) else {
            return false;
        };
        self.columns.remove(col);
        for row in &mut self.rows {
            row.values.remove(col);
        }
        true
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_json_rows(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.values.iter().map(CellValue::to_json))
                    .collect();
                Value::Object(object)
            })
            .collect()
    }
}
