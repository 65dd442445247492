//! A single row keyed by column name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::value::CellValue;

/// One row of tabular input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Zero-based index of the row in the source data.
    ///
    /// Stays fixed when other rows are dropped, so diagnostics always
    /// point back at the input.
    pub row: usize,
    /// Cells in column order.
    pub cells: IndexMap<String, CellValue>,
}

impl Record {
    /// Create an empty record for the given source row.
    pub fn new(row: usize) -> Self {
        Self {
            row,
            cells: IndexMap::new(),
        }
    }

    /// Add a cell (builder style).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Get a cell by column name.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Get a mutable cell by column name.
    pub fn get_mut(&mut self, column: &str) -> Option<&mut CellValue> {
        self.cells.get_mut(column)
    }

    /// Set a cell, appending the column if the record lacks it.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Remove a cell, keeping the order of the remaining columns.
    pub fn remove(&mut self, column: &str) -> Option<CellValue> {
        self.cells.shift_remove(column)
    }

    /// Check whether a column is present and holds a value.
    pub fn has_value(&self, column: &str) -> bool {
        self.cells.get(column).is_some_and(|v| !v.is_missing())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_access() {
        let record = Record::new(3)
            .with("gender", "Female")
            .with("tenure", 1.0)
            .with("TotalCharges", CellValue::Missing);

        assert_eq!(record.row, 3);
        assert_eq!(record.get("gender").and_then(|v| v.as_text()), Some("Female"));
        assert_eq!(record.get("tenure").and_then(|v| v.as_number()), Some(1.0));
        assert!(record.has_value("tenure"));
        assert!(!record.has_value("TotalCharges"));
        assert!(!record.has_value("Churn"));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut record = Record::new(0).with("a", "1").with("b", "2").with("c", "3");
        record.remove("b");
        let keys: Vec<&str> = record.cells.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
