//! Column passes that clean, coerce, filter and label a dataset.

mod normalizer;
mod operations;

pub use normalizer::TabularNormalizer;
pub use operations::{
    coerce_cell, BlankPolicy, Coercion, CoercionFailure, DropReport, FailureKind, PassResult,
    RowAudit, TransformChange, UnmappedPolicy,
};
