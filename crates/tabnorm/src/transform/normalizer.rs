//! Column passes over a dataset.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::bucket::BucketTable;
use crate::dataset::{CellValue, Dataset};
use crate::error::{Result, TabnormError};

use super::operations::{
    coerce_cell, BlankPolicy, Coercion, CoercionFailure, DropReport, FailureKind, PassResult,
    RowAudit, TransformChange, UnmappedPolicy,
};

/// Applies cleaning, coercion, filtering and labelling passes.
///
/// Every pass is a total scan of the dataset that touches one column.
/// Passes that name a column the dataset does not have fail with
/// [`TabnormError::UnknownColumn`] before any row is changed.
pub struct TabularNormalizer;

impl TabularNormalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Remove `suffix` from every text value of `column` that contains it.
    ///
    /// The first occurrence is removed, repeatedly, until none is left, so
    /// applying the pass twice is the same as applying it once. Numeric and
    /// missing cells are left alone.
    pub fn strip_suffix(
        &self,
        data: &mut Dataset,
        column: &str,
        suffix: &str,
    ) -> Result<TransformChange> {
        if suffix.is_empty() {
            return Err(TabnormError::Config(format!(
                "empty suffix for column '{}'",
                column
            )));
        }
        data.require_column(column)?;

        let mut row_audits = Vec::new();
        for record in data.records_mut() {
            let row = record.row;
            let Some(CellValue::Text(value)) = record.get_mut(column) else {
                continue;
            };

            let stripped = remove_all_occurrences(value, suffix);
            if stripped != *value {
                row_audits.push(RowAudit {
                    row,
                    column: column.to_string(),
                    original_value: value.clone(),
                    new_value: stripped.clone(),
                    transform_type: "strip_suffix".to_string(),
                    reason: format!("Removed '{}'", suffix),
                });
                *value = stripped;
            }
        }

        debug!(column, suffix, changed = row_audits.len(), "strip_suffix");

        Ok(TransformChange {
            description: format!("Stripped '{}' from '{}'", suffix, column),
            column: column.to_string(),
            values_changed: row_audits.len(),
            row_audits,
        })
    }

    /// Replace coded values with canonical labels.
    ///
    /// Numeric cells are matched by their rendered form, so `1.0` matches
    /// the code `"1"`. Cells already holding one of the canonical labels are
    /// left as they are. Missing cells stay missing.
    ///
    /// Under [`UnmappedPolicy::Fail`] the first unknown code aborts the pass
    /// with no row changed; under [`UnmappedPolicy::MarkMissing`] unknown
    /// codes become missing and are reported as failures.
    pub fn remap_coded(
        &self,
        data: &mut Dataset,
        column: &str,
        mapping: &IndexMap<String, String>,
        policy: UnmappedPolicy,
    ) -> Result<PassResult> {
        if mapping.is_empty() {
            return Err(TabnormError::Config(format!(
                "empty code mapping for column '{}'",
                column
            )));
        }
        data.require_column(column)?;

        // Plan every change first so a failing row leaves the data untouched.
        let mut planned: Vec<(usize, CellValue, RowAudit)> = Vec::new();
        let mut failures = Vec::new();

        for (idx, record) in data.records().iter().enumerate() {
            let code = match record.get(column) {
                Some(CellValue::Text(s)) => s.clone(),
                Some(cell @ CellValue::Number(_)) => cell.render(),
                Some(CellValue::Missing) | None => continue,
            };

            if let Some(label) = mapping.get(&code) {
                if record.get(column).and_then(|v| v.as_text()) == Some(label.as_str()) {
                    continue;
                }
                planned.push((
                    idx,
                    CellValue::Text(label.clone()),
                    RowAudit {
                        row: record.row,
                        column: column.to_string(),
                        original_value: code.clone(),
                        new_value: label.clone(),
                        transform_type: "remap".to_string(),
                        reason: format!("Mapped code '{}' to '{}'", code, label),
                    },
                ));
                continue;
            }

            if mapping.values().any(|label| *label == code) {
                continue;
            }

            match policy {
                UnmappedPolicy::Fail => {
                    return Err(TabnormError::UnmappedCode {
                        row: record.row,
                        column: column.to_string(),
                        value: code,
                    });
                }
                UnmappedPolicy::MarkMissing => {
                    failures.push(CoercionFailure {
                        row: record.row,
                        column: column.to_string(),
                        raw: code.clone(),
                        kind: FailureKind::Unmapped,
                    });
                    planned.push((
                        idx,
                        CellValue::Missing,
                        RowAudit {
                            row: record.row,
                            column: column.to_string(),
                            original_value: code.clone(),
                            new_value: String::new(),
                            transform_type: "remap".to_string(),
                            reason: format!("Unmapped code '{}' marked missing", code),
                        },
                    ));
                }
            }
        }

        let records = data.records_mut();
        let mut row_audits = Vec::with_capacity(planned.len());
        for (idx, value, audit) in planned {
            records[idx].set(column, value);
            row_audits.push(audit);
        }

        debug!(column, changed = row_audits.len(), "remap_coded");
        if !failures.is_empty() {
            warn!(column, count = failures.len(), "unmapped codes marked missing");
        }

        let codes: Vec<String> = mapping
            .iter()
            .take(3)
            .map(|(from, to)| format!("'{}' → '{}'", from, to))
            .collect();

        Ok(PassResult {
            change: TransformChange {
                description: format!("Remapped '{}': {}", column, codes.join(", ")),
                column: column.to_string(),
                values_changed: row_audits.len(),
                row_audits,
            },
            failures,
        })
    }

    /// Parse a text column into numbers.
    ///
    /// Each value is trimmed and parsed as a finite `f64`. Blank values are
    /// handled by `blank_policy`. A value that cannot be parsed is recorded
    /// as a [`CoercionFailure`] and its cell is marked missing; nothing is
    /// ever substituted from another column.
    pub fn coerce_numeric(
        &self,
        data: &mut Dataset,
        column: &str,
        blank_policy: BlankPolicy,
    ) -> Result<PassResult> {
        data.require_column(column)?;

        let mut row_audits = Vec::new();
        let mut failures = Vec::new();

        for record in data.records_mut() {
            let row = record.row;
            let Some(cell) = record.get_mut(column) else {
                continue;
            };

            let (new_value, reason) = match &*cell {
                CellValue::Missing => continue,
                CellValue::Number(n) if n.is_finite() => continue,
                CellValue::Number(_) => {
                    failures.push(CoercionFailure {
                        row,
                        column: column.to_string(),
                        raw: cell.render(),
                        kind: FailureKind::NonFinite,
                    });
                    (CellValue::Missing, "Non-finite number marked missing".to_string())
                }
                CellValue::Text(raw) => match coerce_cell(raw, blank_policy) {
                    Coercion::Value(v) => (CellValue::Number(v), "Parsed as number".to_string()),
                    Coercion::Missing => {
                        (CellValue::Missing, "Blank value treated as missing".to_string())
                    }
                    Coercion::Failed(kind) => {
                        failures.push(CoercionFailure {
                            row,
                            column: column.to_string(),
                            raw: raw.clone(),
                            kind,
                        });
                        (
                            CellValue::Missing,
                            format!("Could not parse '{}' ({})", raw, kind.as_str()),
                        )
                    }
                },
            };

            let original_value = cell.render();
            let new_rendered = new_value.render();
            *cell = new_value;

            // Same rendering means a clean parse such as "34" -> 34.
            if original_value != new_rendered || matches!(cell, CellValue::Missing) {
                row_audits.push(RowAudit {
                    row,
                    column: column.to_string(),
                    original_value,
                    new_value: new_rendered,
                    transform_type: "coerce".to_string(),
                    reason,
                });
            }
        }

        debug!(column, audited = row_audits.len(), "coerce_numeric");
        if !failures.is_empty() {
            warn!(column, count = failures.len(), "values failed numeric coercion");
        }

        Ok(PassResult {
            change: TransformChange {
                description: format!("Coerced '{}' to number", column),
                column: column.to_string(),
                values_changed: row_audits.len(),
                row_audits,
            },
            failures,
        })
    }

    /// Drop every row lacking a value in any of `required`.
    ///
    /// Retained rows keep their relative order. A row is either kept whole
    /// or removed whole.
    pub fn drop_incomplete<S: AsRef<str>>(
        &self,
        data: &mut Dataset,
        required: &[S],
    ) -> Result<DropReport> {
        for column in required {
            data.require_column(column.as_ref())?;
        }

        let mut rows = Vec::new();
        data.retain(|record| {
            let complete = required.iter().all(|c| record.has_value(c.as_ref()));
            if !complete {
                rows.push(record.row);
            }
            complete
        });

        let required: Vec<String> = required.iter().map(|c| c.as_ref().to_string()).collect();
        if !rows.is_empty() {
            warn!(columns = ?required, dropped = rows.len(), "dropped incomplete rows");
        }

        Ok(DropReport {
            required,
            dropped: rows.len(),
            rows,
        })
    }

    /// Remove a column from the dataset.
    pub fn drop_column(&self, data: &mut Dataset, column: &str) -> Result<TransformChange> {
        data.require_column(column)?;

        let present = data
            .records()
            .iter()
            .filter(|r| r.get(column).is_some())
            .count();
        data.remove_column(column);

        debug!(column, "drop_column");

        Ok(TransformChange {
            description: format!("Dropped column '{}'", column),
            column: column.to_string(),
            values_changed: present,
            row_audits: Vec::new(),
        })
    }

    /// Write the bucket label of `source` into a new `target` column.
    ///
    /// Rows whose `source` is not a number get a missing label.
    pub fn derive_bucket_labels(
        &self,
        data: &mut Dataset,
        source: &str,
        target: &str,
        table: &BucketTable,
    ) -> Result<TransformChange> {
        if source == target {
            return Err(TabnormError::Config(format!(
                "bucket target '{}' must differ from its source",
                target
            )));
        }
        data.require_column(source)?;
        data.add_column(target);

        let mut row_audits = Vec::new();
        for record in data.records_mut() {
            let label = match record.get(source).and_then(|v| v.as_number()) {
                Some(v) => CellValue::Text(table.label(v).to_string()),
                None => CellValue::Missing,
            };
            let original_value = record.get(target).map(|v| v.render()).unwrap_or_default();
            let new_value = label.render();

            if record.get(target) != Some(&label) {
                row_audits.push(RowAudit {
                    row: record.row,
                    column: target.to_string(),
                    original_value,
                    new_value,
                    transform_type: "bucket".to_string(),
                    reason: format!("Binned '{}'", source),
                });
            }
            record.set(target, label);
        }

        debug!(source, target, labelled = row_audits.len(), "derive_bucket_labels");

        Ok(TransformChange {
            description: format!("Binned '{}' into '{}'", source, target),
            column: target.to_string(),
            values_changed: row_audits.len(),
            row_audits,
        })
    }
}

impl Default for TabularNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove the first occurrence of `needle` until none remains.
fn remove_all_occurrences(value: &str, needle: &str) -> String {
    let mut out = value.to_string();
    while let Some(pos) = out.find(needle) {
        out.replace_range(pos..pos + needle.len(), "");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::{BucketRange, OUT_OF_RANGE};
    use crate::dataset::Record;

    fn services() -> Dataset {
        Dataset::from_records(vec![
            Record::new(0).with("OnlineSecurity", "No internet service"),
            Record::new(1).with("OnlineSecurity", "Yes"),
            Record::new(2).with("OnlineSecurity", "No"),
            Record::new(3).with("OnlineSecurity", CellValue::Missing),
        ])
    }

    fn senior() -> IndexMap<String, String> {
        IndexMap::from([
            ("0".to_string(), "No".to_string()),
            ("1".to_string(), "Yes".to_string()),
        ])
    }

    #[test]
    fn test_strip_suffix() {
        let normalizer = TabularNormalizer::new();
        let mut data = services();

        let change = normalizer
            .strip_suffix(&mut data, "OnlineSecurity", " service")
            .unwrap();

        assert_eq!(change.values_changed, 1);
        assert_eq!(data.get(0, "OnlineSecurity"), Some(&CellValue::from("No internet")));
        assert_eq!(data.get(1, "OnlineSecurity"), Some(&CellValue::from("Yes")));
        assert_eq!(data.get(3, "OnlineSecurity"), Some(&CellValue::Missing));
    }

    #[test]
    fn test_strip_suffix_is_idempotent() {
        let normalizer = TabularNormalizer::new();
        let mut data = Dataset::from_records(vec![
            Record::new(0).with("x", "aabb"),
            Record::new(1).with("x", "No phone service"),
        ]);

        normalizer.strip_suffix(&mut data, "x", "ab").unwrap();
        let once = data.clone();
        let change = normalizer.strip_suffix(&mut data, "x", "ab").unwrap();

        assert_eq!(data, once);
        assert_eq!(change.values_changed, 0);
        assert_eq!(data.get(0, "x"), Some(&CellValue::from("")));
    }

    #[test]
    fn test_strip_suffix_unknown_column() {
        let normalizer = TabularNormalizer::new();
        let mut data = services();
        assert!(matches!(
            normalizer.strip_suffix(&mut data, "TechSupport", " service"),
            Err(TabnormError::UnknownColumn { .. })
        ));
        assert!(matches!(
            normalizer.strip_suffix(&mut data, "OnlineSecurity", ""),
            Err(TabnormError::Config(_))
        ));
    }

    #[test]
    fn test_remap_coded() {
        let normalizer = TabularNormalizer::new();
        let mut data = Dataset::from_records(vec![
            Record::new(0).with("SeniorCitizen", "0"),
            Record::new(1).with("SeniorCitizen", 1.0),
            Record::new(2).with("SeniorCitizen", "Yes"),
        ]);

        let result = normalizer
            .remap_coded(&mut data, "SeniorCitizen", &senior(), UnmappedPolicy::Fail)
            .unwrap();

        assert!(result.failures.is_empty());
        assert_eq!(result.change.values_changed, 2);
        assert_eq!(data.get(0, "SeniorCitizen"), Some(&CellValue::from("No")));
        assert_eq!(data.get(1, "SeniorCitizen"), Some(&CellValue::from("Yes")));
        assert_eq!(data.get(2, "SeniorCitizen"), Some(&CellValue::from("Yes")));
    }

    #[test]
    fn test_remap_unmapped_fails_without_changes() {
        let normalizer = TabularNormalizer::new();
        let mut data = Dataset::from_records(vec![
            Record::new(0).with("SeniorCitizen", "0"),
            Record::new(1).with("SeniorCitizen", "2"),
        ]);
        let before = data.clone();

        let err = normalizer
            .remap_coded(&mut data, "SeniorCitizen", &senior(), UnmappedPolicy::Fail)
            .unwrap_err();

        match err {
            TabnormError::UnmappedCode { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "SeniorCitizen");
                assert_eq!(value, "2");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(data, before);
    }

    #[test]
    fn test_remap_unmapped_marked_missing() {
        let normalizer = TabularNormalizer::new();
        let mut data = Dataset::from_records(vec![
            Record::new(0).with("SeniorCitizen", "1"),
            Record::new(1).with("SeniorCitizen", "maybe"),
        ]);

        let result = normalizer
            .remap_coded(
                &mut data,
                "SeniorCitizen",
                &senior(),
                UnmappedPolicy::MarkMissing,
            )
            .unwrap();

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].row, 1);
        assert_eq!(result.failures[0].kind, FailureKind::Unmapped);
        assert_eq!(data.get(1, "SeniorCitizen"), Some(&CellValue::Missing));
    }

    #[test]
    fn test_coerce_numeric() {
        let normalizer = TabularNormalizer::new();
        let mut data = Dataset::from_records(vec![
            Record::new(0).with("TotalCharges", "29.85").with("MonthlyCharges", "29.85"),
            Record::new(1).with("TotalCharges", " ").with("MonthlyCharges", "53.85"),
            Record::new(2).with("TotalCharges", "abc").with("MonthlyCharges", "42.3"),
        ]);

        let result = normalizer
            .coerce_numeric(&mut data, "TotalCharges", BlankPolicy::TreatAsMissing)
            .unwrap();

        assert_eq!(data.get(0, "TotalCharges"), Some(&CellValue::Number(29.85)));
        // Blank is missing, not zero and not the monthly charge.
        assert_eq!(data.get(1, "TotalCharges"), Some(&CellValue::Missing));
        assert_eq!(data.get(2, "TotalCharges"), Some(&CellValue::Missing));
        assert_eq!(data.get(1, "MonthlyCharges"), Some(&CellValue::from("53.85")));

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].row, 2);
        assert_eq!(result.failures[0].raw, "abc");
        assert_eq!(result.failures[0].kind, FailureKind::Malformed);
    }

    #[test]
    fn test_coerce_numeric_blank_fail() {
        let normalizer = TabularNormalizer::new();
        let mut data = Dataset::from_records(vec![Record::new(7).with("tenure", "  ")]);

        let result = normalizer
            .coerce_numeric(&mut data, "tenure", BlankPolicy::Fail)
            .unwrap();

        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].row, 7);
        assert_eq!(result.failures[0].raw, "  ");
        assert_eq!(result.failures[0].kind, FailureKind::Blank);
    }

    #[test]
    fn test_coerce_numeric_keeps_numbers() {
        let normalizer = TabularNormalizer::new();
        let mut data = Dataset::from_records(vec![Record::new(0).with("tenure", 5.0)]);

        let result = normalizer
            .coerce_numeric(&mut data, "tenure", BlankPolicy::Fail)
            .unwrap();

        assert_eq!(result.change.values_changed, 0);
        assert_eq!(data.get(0, "tenure"), Some(&CellValue::Number(5.0)));
    }

    #[test]
    fn test_drop_incomplete() {
        let normalizer = TabularNormalizer::new();
        let records = (0..10)
            .map(|i| {
                let value = if matches!(i, 2 | 5 | 9) {
                    CellValue::Missing
                } else {
                    CellValue::Number(i as f64)
                };
                Record::new(i).with("TotalCharges", value)
            })
            .collect();
        let mut data = Dataset::from_records(records);

        let report = normalizer
            .drop_incomplete(&mut data, &["TotalCharges"])
            .unwrap();

        assert_eq!(report.dropped, 3);
        assert_eq!(report.rows, vec![2, 5, 9]);
        assert_eq!(data.row_count(), 7);
        let kept: Vec<usize> = data.records().iter().map(|r| r.row).collect();
        assert_eq!(kept, vec![0, 1, 3, 4, 6, 7, 8]);
    }

    #[test]
    fn test_drop_incomplete_absent_cell() {
        let normalizer = TabularNormalizer::new();
        let mut data = Dataset::from_records(vec![
            Record::new(0).with("a", 1.0).with("b", 2.0),
            Record::new(1).with("a", 1.0),
        ]);

        let report = normalizer.drop_incomplete(&mut data, &["a", "b"]).unwrap();
        assert_eq!(report.rows, vec![1]);

        assert!(matches!(
            normalizer.drop_incomplete(&mut data, &["c"]),
            Err(TabnormError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_drop_column() {
        let normalizer = TabularNormalizer::new();
        let mut data = Dataset::from_records(vec![
            Record::new(0).with("customerID", "7590-VHVEG").with("gender", "Female"),
        ]);

        let change = normalizer.drop_column(&mut data, "customerID").unwrap();
        assert_eq!(change.values_changed, 1);
        assert!(!data.has_column("customerID"));
    }

    #[test]
    fn test_derive_bucket_labels() {
        let normalizer = TabularNormalizer::new();
        let table = BucketTable::new(vec![
            BucketRange::new(1.0, 7.0, "1-6"),
            BucketRange::new(7.0, 13.0, "7-12"),
        ])
        .unwrap();
        let mut data = Dataset::from_records(vec![
            Record::new(0).with("tenure", 5.0),
            Record::new(1).with("tenure", 0.0),
            Record::new(2).with("tenure", "x"),
        ]);

        normalizer
            .derive_bucket_labels(&mut data, "tenure", "tenure_labels", &table)
            .unwrap();

        assert!(data.has_column("tenure_labels"));
        assert_eq!(data.get(0, "tenure_labels"), Some(&CellValue::from("1-6")));
        assert_eq!(data.get(1, "tenure_labels"), Some(&CellValue::from(OUT_OF_RANGE)));
        assert_eq!(data.get(2, "tenure_labels"), Some(&CellValue::Missing));

        assert!(matches!(
            normalizer.derive_bucket_labels(&mut data, "tenure", "tenure", &table),
            Err(TabnormError::Config(_))
        ));
    }

    #[test]
    fn test_passes_on_empty_dataset_with_columns() {
        let normalizer = TabularNormalizer::new();
        let columns = vec!["SeniorCitizen".to_string(), "TotalCharges".to_string()];
        let mut data = Dataset::with_records(columns.clone(), vec![]);

        let change = normalizer.strip_suffix(&mut data, "TotalCharges", " service").unwrap();
        assert_eq!(change.values_changed, 0);

        let mapping = IndexMap::from([("0".to_string(), "No".to_string())]);
        let remap = normalizer
            .remap_coded(&mut data, "SeniorCitizen", &mapping, UnmappedPolicy::Fail)
            .unwrap();
        assert_eq!(remap.change.values_changed, 0);

        let coerce = normalizer
            .coerce_numeric(&mut data, "TotalCharges", BlankPolicy::TreatAsMissing)
            .unwrap();
        assert!(coerce.failures.is_empty());

        let drop = normalizer.drop_incomplete(&mut data, &["TotalCharges"]).unwrap();
        assert_eq!(drop.dropped, 0);

        let table = BucketTable::new(vec![BucketRange::new(0.0, 501.0, "0-500")]).unwrap();
        normalizer
            .derive_bucket_labels(&mut data, "TotalCharges", "TotalCharge_labels", &table)
            .unwrap();
        assert!(data.has_column("TotalCharge_labels"));

        normalizer.drop_column(&mut data, "SeniorCitizen").unwrap();
        assert_eq!(
            data.columns(),
            &["TotalCharges".to_string(), "TotalCharge_labels".to_string()]
        );
        assert_eq!(data.row_count(), 0);
    }
}
