//! Half-open range tables for turning numbers into labels.

pub mod presets;
mod table;

pub use table::{bucket, BucketRange, BucketTable, OUT_OF_RANGE};
