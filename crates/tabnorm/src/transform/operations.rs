//! Policies, per-cell coercion and the audit records passes produce.

use serde::{Deserialize, Serialize};

/// What a numeric coercion does with blank (whitespace-only) text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankPolicy {
    /// Blank becomes [`CellValue::Missing`](crate::CellValue::Missing).
    #[default]
    TreatAsMissing,
    /// Blank is a coercion failure like any other malformed value.
    Fail,
}

/// What a code remapping does with a value outside its mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Abort the pass with [`TabnormError::UnmappedCode`](crate::TabnormError::UnmappedCode).
    #[default]
    Fail,
    /// Mark the cell missing and report it as a failure so the row can be dropped.
    MarkMissing,
}

/// Why a cell could not be brought into its target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Whitespace-only under [`BlankPolicy::Fail`].
    Blank,
    /// Not a number.
    Malformed,
    /// Parsed, but NaN or infinite.
    NonFinite,
    /// Outside a remapping's codes.
    Unmapped,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Blank => "blank",
            FailureKind::Malformed => "malformed",
            FailureKind::NonFinite => "non_finite",
            FailureKind::Unmapped => "unmapped",
        }
    }
}

/// A cell that failed coercion, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoercionFailure {
    /// Source row index.
    pub row: usize,
    pub column: String,
    /// The value exactly as it was before the pass.
    pub raw: String,
    pub kind: FailureKind,
}

/// Outcome of coercing a single raw value to a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coercion {
    Value(f64),
    /// Blank under [`BlankPolicy::TreatAsMissing`].
    Missing,
    Failed(FailureKind),
}

/// Trim and parse `raw` as a finite `f64`.
pub fn coerce_cell(raw: &str, blank_policy: BlankPolicy) -> Coercion {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return match blank_policy {
            BlankPolicy::TreatAsMissing => Coercion::Missing,
            BlankPolicy::Fail => Coercion::Failed(FailureKind::Blank),
        };
    }

    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Coercion::Value(v),
        Ok(_) => Coercion::Failed(FailureKind::NonFinite),
        Err(_) => Coercion::Failed(FailureKind::Malformed),
    }
}

/// Audit information for a single cell change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowAudit {
    /// Source row index.
    pub row: usize,

    /// Column that was changed.
    pub column: String,

    /// Rendered value before the pass.
    pub original_value: String,

    /// Rendered value after the pass (empty for missing).
    pub new_value: String,

    /// Pass that made the change.
    pub transform_type: String,

    /// Reason for the change.
    pub reason: String,
}

/// What one pass did to one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformChange {
    /// Description of the change.
    pub description: String,

    /// Column affected.
    pub column: String,

    /// Number of values changed.
    pub values_changed: usize,

    /// Per-row audit information.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub row_audits: Vec<RowAudit>,
}

/// Result of a pass that can fail row by row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassResult {
    pub change: TransformChange,
    /// Failures in row order.
    pub failures: Vec<CoercionFailure>,
}

/// Rows removed by a completeness filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropReport {
    /// Columns that had to hold a value.
    pub required: Vec<String>,
    /// Number of rows removed.
    pub dropped: usize,
    /// Source indices of the removed rows, ascending.
    pub rows: Vec<usize>,
}
