//! Bucket ranges for the Telco customer churn dataset.
//!
//! Ranges are returned unvalidated so they can be embedded in a
//! [`PipelineConfig`](crate::PipelineConfig); build a
//! [`BucketTable`](super::BucketTable) from them to look values up.

use super::table::BucketRange;

/// Months of tenure in six-month bins, `[1, 7)` through `[67, 73)`.
///
/// Tenure 0 (customers in their first month) is out of range.
pub fn tenure_ranges() -> Vec<BucketRange> {
    (0..12)
        .map(|i| {
            let lo = 1 + i * 6;
            let hi = lo + 6;
            let label = if i == 11 {
                format!("{}-{}+", lo, hi - 1)
            } else {
                format!("{}-{}", lo, hi - 1)
            };
            BucketRange::new(lo as f64, hi as f64, label)
        })
        .collect()
}

/// Monthly charges in 25-unit bins from 0 up to 125.
pub fn monthly_charge_ranges() -> Vec<BucketRange> {
    vec![
        BucketRange::new(0.0, 26.0, "0-25"),
        BucketRange::new(26.0, 51.0, "26-50"),
        BucketRange::new(51.0, 76.0, "51-75"),
        BucketRange::new(76.0, 101.0, "76-100"),
        BucketRange::new(101.0, 126.0, "101-125"),
    ]
}

/// Total charges in 500-unit bins up to 10000, then one open bin.
pub fn total_charge_ranges() -> Vec<BucketRange> {
    let mut ranges = vec![BucketRange::new(0.0, 501.0, "0-500")];
    for step in 1..19 {
        let lo = step * 500 + 1;
        ranges.push(BucketRange::new(
            lo as f64,
            (lo + 500) as f64,
            format!("{}-{}", lo, lo + 499),
        ));
    }
    ranges.push(BucketRange::new(9501.0, 10000.0, "9501-10000"));
    ranges.push(BucketRange::at_least(10000.0, "10000+"));
    ranges
}
