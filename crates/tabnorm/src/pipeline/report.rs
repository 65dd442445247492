//! What a pipeline run did.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::SourceMetadata;
use crate::transform::{CoercionFailure, DropReport, TransformChange};

/// Output contract of a run, next to the cleaned dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizationReport {
    /// Name of the pipeline that ran.
    pub pipeline: String,

    /// Source file, when the data was loaded from one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceMetadata>,

    pub input_rows: usize,
    pub output_rows: usize,
    pub steps_applied: usize,

    /// One entry per column touched, in step order.
    pub changes: Vec<TransformChange>,

    /// Row-level failures from every coercion and remap step.
    pub failures: Vec<CoercionFailure>,

    /// Rows removed by each completeness filter.
    pub drops: Vec<DropReport>,
}

impl NormalizationReport {
    pub(crate) fn new(pipeline: impl Into<String>, input_rows: usize) -> Self {
        Self {
            pipeline: pipeline.into(),
            source: None,
            input_rows,
            output_rows: input_rows,
            steps_applied: 0,
            changes: Vec::new(),
            failures: Vec::new(),
            drops: Vec::new(),
        }
    }

    /// Attach provenance of the input file.
    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }

    /// Total rows removed by all completeness filters.
    pub fn dropped_rows(&self) -> usize {
        self.drops.iter().map(|d| d.dropped).sum()
    }

    /// Number of failures per column, in first-seen order.
    pub fn failures_by_column(&self) -> IndexMap<String, usize> {
        let mut counts = IndexMap::new();
        for failure in &self.failures {
            *counts.entry(failure.column.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Total values changed across all steps.
    pub fn values_changed(&self) -> usize {
        self.changes.iter().map(|c| c.values_changed).sum()
    }

    /// True when no value failed coercion.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Remove per-row audits, keeping the per-column totals.
    pub fn strip_audits(&mut self) {
        for change in &mut self.changes {
            change.row_audits.clear();
        }
    }
}
