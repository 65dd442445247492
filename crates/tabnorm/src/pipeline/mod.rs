//! Declarative pipelines of normalization passes.

mod config;
mod persistence;
mod report;
mod runner;

pub use config::{PipelineConfig, PipelineStep};
pub use persistence::{cleaned_path, report_path};
pub use report::NormalizationReport;
pub use runner::Pipeline;
