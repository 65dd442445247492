//! Descriptive tabulation for a reporting layer.
//!
//! These are the counts a count plot or bar chart is drawn from: how many
//! values are missing, how often each label occurs, and how each label
//! splits across an outcome column such as `Churn`.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::bucket::BucketTable;
use crate::dataset::{CellValue, Dataset};
use crate::error::Result;

/// Key used for missing cells in counts.
pub const MISSING_KEY: &str = "<missing>";

/// Label × outcome counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Crosstab {
    /// Column whose values form the rows.
    pub column: String,
    /// Column whose values form the columns.
    pub by: String,
    /// Outcome values in first-seen order.
    pub outcomes: Vec<String>,
    /// Label → outcome → count.
    pub counts: IndexMap<String, IndexMap<String, usize>>,
}

impl Crosstab {
    /// Count for a label/outcome pair (zero if never seen).
    pub fn count(&self, label: &str, outcome: &str) -> usize {
        self.counts
            .get(label)
            .and_then(|row| row.get(outcome))
            .copied()
            .unwrap_or(0)
    }

    /// Total rows with the given label.
    pub fn label_total(&self, label: &str) -> usize {
        self.counts
            .get(label)
            .map(|row| row.values().sum())
            .unwrap_or(0)
    }

    /// Share of a label's rows that have `outcome`, if the label occurs.
    pub fn rate(&self, label: &str, outcome: &str) -> Option<f64> {
        let total = self.label_total(label);
        if total == 0 {
            None
        } else {
            Some(self.count(label, outcome) as f64 / total as f64)
        }
    }
}

fn key(value: Option<&CellValue>) -> String {
    match value {
        Some(CellValue::Missing) | None => MISSING_KEY.to_string(),
        Some(v) => v.render(),
    }
}

/// Missing cells per column, in column order.
pub fn null_counts(data: &Dataset) -> IndexMap<String, usize> {
    data.columns()
        .iter()
        .map(|column| {
            let nulls = data
                .column_values(column)
                .filter(|v| v.is_none_or(|v| v.is_missing()))
                .count();
            (column.clone(), nulls)
        })
        .collect()
}

/// Number of rows whose value in `column` repeats an earlier row's.
pub fn duplicate_count(data: &Dataset, column: &str) -> Result<usize> {
    data.require_column(column)?;

    let mut seen = HashSet::new();
    Ok(data
        .column_values(column)
        .filter(|v| !seen.insert(key(*v)))
        .count())
}

/// Occurrences of each value in `column`, in first-seen order.
pub fn value_counts(data: &Dataset, column: &str) -> Result<IndexMap<String, usize>> {
    data.require_column(column)?;

    let mut counts = IndexMap::new();
    for value in data.column_values(column) {
        *counts.entry(key(value)).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Split each value of `column` by the values of `by`.
pub fn crosstab(data: &Dataset, column: &str, by: &str) -> Result<Crosstab> {
    data.require_column(column)?;
    data.require_column(by)?;

    let mut table = Crosstab {
        column: column.to_string(),
        by: by.to_string(),
        ..Crosstab::default()
    };

    for record in data.records() {
        let label = key(record.get(column));
        let outcome = key(record.get(by));
        if !table.outcomes.contains(&outcome) {
            table.outcomes.push(outcome.clone());
        }
        *table
            .counts
            .entry(label)
            .or_default()
            .entry(outcome)
            .or_insert(0) += 1;
    }

    Ok(table)
}

/// Like [`crosstab`], with rows in bucket order.
///
/// Every bucket label gets a row even when empty; labels outside the table
/// (out of range, missing) follow in first-seen order.
pub fn crosstab_ordered(
    data: &Dataset,
    column: &str,
    by: &str,
    buckets: &BucketTable,
) -> Result<Crosstab> {
    let mut table = crosstab(data, column, by)?;

    let mut ordered: IndexMap<String, IndexMap<String, usize>> = buckets
        .labels()
        .map(|label| {
            let row = table.counts.shift_remove(label).unwrap_or_default();
            (label.to_string(), row)
        })
        .collect();
    ordered.extend(table.counts.drain(..));
    table.counts = ordered;

    Ok(table)
}
