//! Ordered collection of records.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabnormError};

use super::record::Record;
use super::value::CellValue;

/// An ordered sequence of records sharing a column list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Column names in display order.
    columns: Vec<String>,
    /// Rows in source order.
    records: Vec<Record>,
}

impl Dataset {
    /// Create an empty dataset with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Build a dataset from raw string rows, one text cell per header.
    ///
    /// Rows are numbered from zero in the order given.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let mut record = Record::new(row_idx);
                for (header, value) in headers.iter().zip(row) {
                    record.set(header.clone(), CellValue::Text(value));
                }
                record
            })
            .collect();

        Self {
            columns: headers,
            records,
        }
    }

    /// Build a dataset from records, collecting columns in first-seen order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut dataset = Self::default();
        for record in records {
            dataset.push(record);
        }
        dataset
    }

    /// Build a dataset with a declared schema.
    ///
    /// The columns are kept even when `records` is empty; columns that only
    /// appear in the records are appended in first-seen order.
    pub fn with_records(columns: Vec<String>, records: Vec<Record>) -> Self {
        let mut dataset = Self::new(columns);
        for record in records {
            dataset.push(record);
        }
        dataset
    }

    /// Append a record, registering any columns not seen before.
    pub fn push(&mut self, record: Record) {
        for column in record.cells.keys() {
            if !self.has_column(column) {
                self.columns.push(column.clone());
            }
        }
        self.records.push(record);
    }

    /// Get the column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Get mutable access to the records.
    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    /// Consume the dataset and return its records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check whether a column is part of the schema.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Get the position of a column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Fail with [`TabnormError::UnknownColumn`] if the column is absent.
    pub fn require_column(&self, name: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(TabnormError::unknown_column(name))
        }
    }

    /// Register a column at the end of the schema if it is not present.
    pub fn add_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_column(&name) {
            self.columns.push(name);
        }
    }

    /// Remove a column from the schema and from every record.
    ///
    /// Returns false if the column was not present.
    pub fn remove_column(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(index);
        for record in &mut self.records {
            record.remove(name);
        }
        true
    }

    /// Iterate over one column's cells; absent cells yield `None`.
    pub fn column_values<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = Option<&'a CellValue>> + 'a {
        self.records.iter().map(move |r| r.get(name))
    }

    /// Keep only the records matching the predicate, preserving order.
    pub(crate) fn retain(&mut self, f: impl FnMut(&Record) -> bool) {
        self.records.retain(f);
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        self.records.get(row).and_then(|r| r.get(column))
    }
}
