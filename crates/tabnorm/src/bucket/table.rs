//! Validated bucket tables and the range lookup.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabnormError};

/// Label returned when a value falls outside every range.
pub const OUT_OF_RANGE: &str = "out of range";

/// One labelled interval `[lo, hi)`.
///
/// In JSON an absent or `null` `hi` means the range is unbounded above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketRange {
    /// Inclusive lower bound, always finite.
    pub lo: f64,
    /// Exclusive upper bound.
    #[serde(with = "upper_bound", default = "unbounded")]
    pub hi: f64,
    pub label: String,
}

impl BucketRange {
    pub fn new(lo: f64, hi: f64, label: impl Into<String>) -> Self {
        Self {
            lo,
            hi,
            label: label.into(),
        }
    }

    /// A range with no upper bound.
    pub fn at_least(lo: f64, label: impl Into<String>) -> Self {
        Self::new(lo, f64::INFINITY, label)
    }

    /// Check whether `lo <= value < hi`.
    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value < self.hi
    }
}

fn unbounded() -> f64 {
    f64::INFINITY
}

mod upper_bound {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hi: &f64, s: S) -> Result<S::Ok, S::Error> {
        if *hi == f64::INFINITY {
            s.serialize_none()
        } else {
            s.serialize_some(hi)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::INFINITY))
    }
}

/// An ordered set of contiguous, non-overlapping ranges.
///
/// Construction is the only place ranges are checked, so every table that
/// exists can be looked up without further validation. Deserializing a
/// table runs the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BucketRange>", into = "Vec<BucketRange>")]
pub struct BucketTable {
    ranges: Vec<BucketRange>,
}

impl BucketTable {
    /// Validate and build a table. Ranges may be given in any order.
    pub fn new(mut ranges: Vec<BucketRange>) -> Result<Self> {
        if ranges.is_empty() {
            return Err(TabnormError::Config(
                "bucket table must have at least one range".to_string(),
            ));
        }

        let mut labels = HashSet::new();
        for range in &ranges {
            if range.label.is_empty() {
                return Err(TabnormError::Config("bucket label is empty".to_string()));
            }
            if range.label == OUT_OF_RANGE {
                return Err(TabnormError::Config(format!(
                    "bucket label '{}' is reserved",
                    OUT_OF_RANGE
                )));
            }
            if !labels.insert(range.label.as_str()) {
                return Err(TabnormError::Config(format!(
                    "duplicate bucket label '{}'",
                    range.label
                )));
            }
            if !range.lo.is_finite() || range.hi.is_nan() {
                return Err(TabnormError::Config(format!(
                    "bucket '{}' has an invalid bound",
                    range.label
                )));
            }
            if range.lo >= range.hi {
                return Err(TabnormError::Config(format!(
                    "bucket '{}' is empty: [{}, {})",
                    range.label, range.lo, range.hi
                )));
            }
        }

        ranges.sort_by(|a, b| a.lo.total_cmp(&b.lo));

        for pair in ranges.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.hi > next.lo {
                return Err(TabnormError::Config(format!(
                    "buckets '{}' [{}, {}) and '{}' [{}, {}) overlap",
                    prev.label, prev.lo, prev.hi, next.label, next.lo, next.hi
                )));
            }
            if prev.hi < next.lo {
                return Err(TabnormError::Config(format!(
                    "gap between buckets '{}' and '{}': [{}, {}) is not covered",
                    prev.label, next.label, prev.hi, next.lo
                )));
            }
        }

        Ok(Self { ranges })
    }

    /// Ranges in ascending order.
    pub fn ranges(&self) -> &[BucketRange] {
        &self.ranges
    }

    /// Labels in ascending range order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.ranges.iter().map(|r| r.label.as_str())
    }

    /// Find the range containing `value`.
    pub fn lookup(&self, value: f64) -> Option<&BucketRange> {
        self.ranges.iter().find(|r| r.contains(value))
    }

    /// Label for `value`, or [`OUT_OF_RANGE`].
    pub fn label(&self, value: f64) -> &str {
        bucket(value, self)
    }

    /// Lowest covered value.
    pub fn lower_bound(&self) -> f64 {
        self.ranges[0].lo
    }

    /// Exclusive upper end of the covered domain.
    pub fn upper_bound(&self) -> f64 {
        self.ranges[self.ranges.len() - 1].hi
    }
}

impl TryFrom<Vec<BucketRange>> for BucketTable {
    type Error = TabnormError;

    fn try_from(ranges: Vec<BucketRange>) -> Result<Self> {
        Self::new(ranges)
    }
}

impl From<BucketTable> for Vec<BucketRange> {
    fn from(table: BucketTable) -> Self {
        table.ranges
    }
}

/// Map a value to the label of the range containing it.
///
/// Values below the first bound, at or above the last, and NaN all map to
/// [`OUT_OF_RANGE`].
pub fn bucket(value: f64, table: &BucketTable) -> &str {
    table
        .lookup(value)
        .map(|r| r.label.as_str())
        .unwrap_or(OUT_OF_RANGE)
}
