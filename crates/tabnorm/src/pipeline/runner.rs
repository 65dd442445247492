//! Validated pipelines and their execution.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::bucket::BucketTable;
use crate::dataset::Dataset;
use crate::error::{Result, TabnormError};
use crate::transform::TabularNormalizer;

use super::config::{PipelineConfig, PipelineStep};
use super::report::NormalizationReport;

/// A step whose bucket ranges have been checked.
#[derive(Debug, Clone)]
enum CompiledStep {
    Plain(PipelineStep),
    Bucket {
        source: String,
        target: String,
        table: BucketTable,
    },
}

impl CompiledStep {
    /// Columns the step reads.
    fn reads(&self) -> Vec<&str> {
        match self {
            CompiledStep::Bucket { source, .. } => vec![source.as_str()],
            CompiledStep::Plain(step) => match step {
                PipelineStep::StripSuffix { columns, .. }
                | PipelineStep::DropIncomplete { columns } => {
                    columns.iter().map(|c| c.as_str()).collect()
                }
                PipelineStep::Remap { column, .. }
                | PipelineStep::Coerce { column, .. }
                | PipelineStep::DropColumn { column } => vec![column.as_str()],
                PipelineStep::Bucket { source, .. } => vec![source.as_str()],
            },
        }
    }
}

/// A configuration whose structure has been validated.
///
/// All configuration errors (malformed or overlapping bucket ranges, empty
/// column lists, empty suffixes or mappings) surface from [`Pipeline::new`],
/// and missing columns surface from [`Pipeline::run`] before any row is
/// touched.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    steps: Vec<CompiledStep>,
    keep_audits: bool,
}

impl Pipeline {
    /// Validate a configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let mut steps = Vec::with_capacity(config.steps.len());

        for (index, step) in config.steps.into_iter().enumerate() {
            let op = step.op();
            let context =
                |msg: String| TabnormError::Config(format!("step {} ({}): {}", index + 1, op, msg));

            validate_step(&step).map_err(context)?;

            let compiled = match step {
                PipelineStep::Bucket {
                    ref source,
                    ref target,
                    ref ranges,
                } => {
                    let table = BucketTable::new(ranges.clone()).map_err(|e| match e {
                        TabnormError::Config(msg) => context(msg),
                        other => other,
                    })?;
                    CompiledStep::Bucket {
                        source: source.clone(),
                        target: target.clone(),
                        table,
                    }
                }
                step => CompiledStep::Plain(step),
            };
            steps.push(compiled);
        }

        Ok(Self {
            name: config.name,
            steps,
            keep_audits: true,
        })
    }

    /// The Telco churn preset, validated.
    pub fn telco_churn() -> Result<Self> {
        Self::new(PipelineConfig::telco_churn())
    }

    /// Keep or discard per-row audits in the report.
    pub fn keep_audits(mut self, keep: bool) -> Self {
        self.keep_audits = keep;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check that every column a step reads exists at that point.
    ///
    /// Columns created by earlier bucket steps count; columns removed by
    /// earlier drop steps do not.
    pub fn check_columns(&self, data: &Dataset) -> Result<()> {
        let mut available: HashSet<&str> = data.columns().iter().map(|c| c.as_str()).collect();

        for step in &self.steps {
            for column in step.reads() {
                if !available.contains(column) {
                    return Err(TabnormError::unknown_column(column));
                }
            }
            match step {
                CompiledStep::Plain(PipelineStep::DropColumn { column }) => {
                    available.remove(column.as_str());
                }
                CompiledStep::Bucket { target, .. } => {
                    available.insert(target.as_str());
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Run every step in order.
    ///
    /// Row-level failures never abort the run; they are collected in the
    /// report. An unmapped code under [`UnmappedPolicy::Fail`] does abort it.
    ///
    /// [`UnmappedPolicy::Fail`]: crate::transform::UnmappedPolicy::Fail
    pub fn run(&self, mut data: Dataset) -> Result<(Dataset, NormalizationReport)> {
        self.check_columns(&data)?;

        let normalizer = TabularNormalizer::new();
        let mut report = NormalizationReport::new(&self.name, data.row_count());

        for step in &self.steps {
            match step {
                CompiledStep::Bucket {
                    source,
                    target,
                    table,
                } => {
                    let change = normalizer.derive_bucket_labels(&mut data, source, target, table)?;
                    report.changes.push(change);
                }
                CompiledStep::Plain(step) => {
                    debug!(op = step.op(), "{}", step.description());
                    self.apply(&normalizer, step, &mut data, &mut report)?;
                }
            }
            report.steps_applied += 1;
        }

        report.output_rows = data.row_count();
        if !self.keep_audits {
            report.strip_audits();
        }

        if report.is_clean() {
            info!(
                pipeline = %self.name,
                input_rows = report.input_rows,
                output_rows = report.output_rows,
                "pipeline finished"
            );
        } else {
            warn!(
                pipeline = %self.name,
                input_rows = report.input_rows,
                output_rows = report.output_rows,
                failures = report.failures.len(),
                "pipeline finished with coercion failures"
            );
        }

        Ok((data, report))
    }

    fn apply(
        &self,
        normalizer: &TabularNormalizer,
        step: &PipelineStep,
        data: &mut Dataset,
        report: &mut NormalizationReport,
    ) -> Result<()> {
        match step {
            PipelineStep::StripSuffix { columns, suffix } => {
                for column in columns {
                    let change = normalizer.strip_suffix(data, column, suffix)?;
                    report.changes.push(change);
                }
            }
            PipelineStep::Remap {
                column,
                mapping,
                on_unmapped,
            } => {
                let result = normalizer.remap_coded(data, column, mapping, *on_unmapped)?;
                report.changes.push(result.change);
                report.failures.extend(result.failures);
            }
            PipelineStep::Coerce {
                column,
                blank_policy,
            } => {
                let result = normalizer.coerce_numeric(data, column, *blank_policy)?;
                report.changes.push(result.change);
                report.failures.extend(result.failures);
            }
            PipelineStep::DropColumn { column } => {
                let change = normalizer.drop_column(data, column)?;
                report.changes.push(change);
            }
            PipelineStep::DropIncomplete { columns } => {
                let drop = normalizer.drop_incomplete(data, columns)?;
                report.drops.push(drop);
            }
            PipelineStep::Bucket { .. } => {
                // Compiled into CompiledStep::Bucket by Pipeline::new.
            }
        }
        Ok(())
    }
}

/// Structural checks that do not need the data.
fn validate_step(step: &PipelineStep) -> std::result::Result<(), String> {
    fn named(column: &str) -> std::result::Result<(), String> {
        if column.trim().is_empty() {
            Err("column name is empty".to_string())
        } else {
            Ok(())
        }
    }

    match step {
        PipelineStep::StripSuffix { columns, suffix } => {
            if columns.is_empty() {
                return Err("no columns listed".to_string());
            }
            if suffix.is_empty() {
                return Err("suffix is empty".to_string());
            }
            columns.iter().try_for_each(|c| named(c))
        }
        PipelineStep::Remap {
            column, mapping, ..
        } => {
            named(column)?;
            if mapping.is_empty() {
                return Err(format!("mapping for '{}' is empty", column));
            }
            Ok(())
        }
        PipelineStep::Coerce { column, .. } | PipelineStep::DropColumn { column } => {
            named(column)
        }
        PipelineStep::DropIncomplete { columns } => {
            if columns.is_empty() {
                return Err("no columns listed".to_string());
            }
            columns.iter().try_for_each(|c| named(c))
        }
        PipelineStep::Bucket { source, target, .. } => {
            named(source)?;
            named(target)?;
            if source == target {
                return Err(format!("target '{}' must differ from its source", target));
            }
            Ok(())
        }
    }
}
