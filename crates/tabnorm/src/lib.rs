//! tabnorm: tolerant normalization and range bucketing for tabular datasets.
//!
//! A dataset is an ordered list of records keyed by column name. Cleaning
//! happens in explicit passes, each a total scan over one column:
//!
//! - **Clean**: strip a literal suffix, remap coded values to labels
//! - **Coerce**: parse text as numbers, collecting failures instead of guessing
//! - **Filter**: drop rows missing a required value, never imputing
//! - **Label**: bin a numeric column through a validated range table
//!
//! Passes are usually driven by a [`Pipeline`], whose configuration is
//! checked before any row is touched.
//!
//! # Example
//!
//! ```
//! use tabnorm::{BlankPolicy, CellValue, Dataset, PipelineConfig, PipelineStep, Pipeline, Record};
//!
//! let data = Dataset::from_records(vec![
//!     Record::new(0).with("TotalCharges", "29.85"),
//!     Record::new(1).with("TotalCharges", " "),
//! ]);
//!
//! let pipeline = Pipeline::new(
//!     PipelineConfig::new("totals")
//!         .with_step(PipelineStep::Coerce {
//!             column: "TotalCharges".to_string(),
//!             blank_policy: BlankPolicy::TreatAsMissing,
//!         })
//!         .with_step(PipelineStep::DropIncomplete {
//!             columns: vec!["TotalCharges".to_string()],
//!         }),
//! )
//! .unwrap();
//!
//! let (clean, report) = pipeline.run(data).unwrap();
//! assert_eq!(clean.row_count(), 1);
//! assert_eq!(clean.get(0, "TotalCharges"), Some(&CellValue::Number(29.85)));
//! assert_eq!(report.dropped_rows(), 1);
//! ```

pub mod bucket;
pub mod dataset;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod summary;
pub mod transform;

pub use bucket::{bucket, BucketRange, BucketTable, OUT_OF_RANGE};
pub use dataset::{CellValue, Dataset, Record};
pub use error::{Result, TabnormError};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use pipeline::{NormalizationReport, Pipeline, PipelineConfig, PipelineStep};
pub use transform::{
    BlankPolicy, CoercionFailure, DropReport, FailureKind, TabularNormalizer, TransformChange,
    UnmappedPolicy,
};
