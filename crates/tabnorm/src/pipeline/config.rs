//! Pipeline configuration: an ordered list of steps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::bucket::presets::{monthly_charge_ranges, tenure_ranges, total_charge_ranges};
use crate::bucket::BucketRange;
use crate::transform::{BlankPolicy, UnmappedPolicy};

/// One pass in a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PipelineStep {
    /// Remove a literal substring from each listed column.
    StripSuffix { columns: Vec<String>, suffix: String },

    /// Replace codes with canonical labels.
    Remap {
        column: String,
        mapping: IndexMap<String, String>,
        #[serde(default)]
        on_unmapped: UnmappedPolicy,
    },

    /// Parse a column as numbers.
    Coerce {
        column: String,
        #[serde(default)]
        blank_policy: BlankPolicy,
    },

    /// Remove a column entirely.
    DropColumn { column: String },

    /// Remove rows missing a value in any listed column.
    DropIncomplete { columns: Vec<String> },

    /// Derive a label column from a numeric one.
    Bucket {
        source: String,
        target: String,
        ranges: Vec<BucketRange>,
    },
}

impl PipelineStep {
    /// Get a human-readable description of the step.
    pub fn description(&self) -> String {
        match self {
            PipelineStep::StripSuffix { columns, suffix } => {
                format!("Strip '{}' from {}", suffix, columns.join(", "))
            }
            PipelineStep::Remap {
                column,
                mapping,
                on_unmapped,
            } => {
                let examples: Vec<String> = mapping
                    .iter()
                    .take(3)
                    .map(|(from, to)| format!("'{}' → '{}'", from, to))
                    .collect();
                format!(
                    "Remap '{}': {} (unmapped: {:?})",
                    column,
                    examples.join(", "),
                    on_unmapped
                )
            }
            PipelineStep::Coerce {
                column,
                blank_policy,
            } => format!("Coerce '{}' to number (blank: {:?})", column, blank_policy),
            PipelineStep::DropColumn { column } => format!("Drop column '{}'", column),
            PipelineStep::DropIncomplete { columns } => {
                format!("Drop rows missing {}", columns.join(", "))
            }
            PipelineStep::Bucket {
                source,
                target,
                ranges,
            } => format!("Bin '{}' into '{}' ({} ranges)", source, target, ranges.len()),
        }
    }

    /// Short name of the pass, matching the JSON `op` tag.
    pub fn op(&self) -> &'static str {
        match self {
            PipelineStep::StripSuffix { .. } => "strip_suffix",
            PipelineStep::Remap { .. } => "remap",
            PipelineStep::Coerce { .. } => "coerce",
            PipelineStep::DropColumn { .. } => "drop_column",
            PipelineStep::DropIncomplete { .. } => "drop_incomplete",
            PipelineStep::Bucket { .. } => "bucket",
        }
    }
}

/// A named, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<PipelineStep>,
}

impl PipelineConfig {
    /// Create an empty pipeline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    pub fn with_step(mut self, step: PipelineStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Cleaning for the Telco customer churn export.
    ///
    /// Drops the customer id, shortens "No internet service" / "No phone
    /// service" to "No internet" / "No phone", spells out SeniorCitizen,
    /// parses the charge and tenure columns, drops rows whose total charge
    /// is blank (new customers) and derives three label columns.
    pub fn telco_churn() -> Self {
        let service_columns = [
            "MultipleLines",
            "OnlineSecurity",
            "OnlineBackup",
            "DeviceProtection",
            "TechSupport",
            "StreamingTV",
            "StreamingMovies",
        ];

        Self::new("telco-churn")
            .with_step(PipelineStep::DropColumn {
                column: "customerID".to_string(),
            })
            .with_step(PipelineStep::StripSuffix {
                columns: service_columns.iter().map(|c| c.to_string()).collect(),
                suffix: " service".to_string(),
            })
            .with_step(PipelineStep::Remap {
                column: "SeniorCitizen".to_string(),
                mapping: IndexMap::from([
                    ("0".to_string(), "No".to_string()),
                    ("1".to_string(), "Yes".to_string()),
                ]),
                on_unmapped: UnmappedPolicy::Fail,
            })
            .with_step(PipelineStep::Coerce {
                column: "tenure".to_string(),
                blank_policy: BlankPolicy::Fail,
            })
            .with_step(PipelineStep::Coerce {
                column: "MonthlyCharges".to_string(),
                blank_policy: BlankPolicy::Fail,
            })
            .with_step(PipelineStep::Coerce {
                column: "TotalCharges".to_string(),
                blank_policy: BlankPolicy::TreatAsMissing,
            })
            .with_step(PipelineStep::DropIncomplete {
                columns: vec![
                    "tenure".to_string(),
                    "MonthlyCharges".to_string(),
                    "TotalCharges".to_string(),
                ],
            })
            .with_step(PipelineStep::Bucket {
                source: "tenure".to_string(),
                target: "tenure_labels".to_string(),
                ranges: tenure_ranges(),
            })
            .with_step(PipelineStep::Bucket {
                source: "MonthlyCharges".to_string(),
                target: "MonthlyCharge_labels".to_string(),
                ranges: monthly_charge_ranges(),
            })
            .with_step(PipelineStep::Bucket {
                source: "TotalCharges".to_string(),
                target: "TotalCharge_labels".to_string(),
                ranges: total_charge_ranges(),
            })
    }

    /// Label columns derived by the bucket steps, in order.
    pub fn label_columns(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|step| match step {
            PipelineStep::Bucket { target, .. } => Some(target.as_str()),
            _ => None,
        })
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::telco_churn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_json_shape() {
        let json = r#"[
            {"op": "strip_suffix", "columns": ["TechSupport"], "suffix": " service"},
            {"op": "remap", "column": "SeniorCitizen", "mapping": {"0": "No", "1": "Yes"}},
            {"op": "coerce", "column": "TotalCharges"},
            {"op": "drop_incomplete", "columns": ["TotalCharges"]},
            {"op": "bucket", "source": "tenure", "target": "tenure_labels",
             "ranges": [{"lo": 1, "hi": 7, "label": "1-6"}]}
        ]"#;

        let steps: Vec<PipelineStep> = serde_json::from_str(json).unwrap();
        assert_eq!(steps.len(), 5);
        assert!(matches!(
            &steps[1],
            PipelineStep::Remap { on_unmapped: UnmappedPolicy::Fail, .. }
        ));
        assert!(matches!(
            &steps[2],
            PipelineStep::Coerce { blank_policy: BlankPolicy::TreatAsMissing, .. }
        ));
        assert_eq!(steps[4].op(), "bucket");
    }

    #[test]
    fn test_telco_preset() {
        let config = PipelineConfig::telco_churn();
        assert_eq!(config.steps.len(), 10);

        let labels: Vec<&str> = config.label_columns().collect();
        assert_eq!(
            labels,
            vec!["tenure_labels", "MonthlyCharge_labels", "TotalCharge_labels"]
        );
        assert!(config.steps[0].description().contains("customerID"));
    }
}
