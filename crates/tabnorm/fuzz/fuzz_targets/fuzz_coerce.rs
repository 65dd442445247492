//! Fuzz target for numeric coercion and bucket lookup.
//!
//! A value that coerces must be finite, and its bucket label must be
//! either a preset label or the out-of-range label.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabnorm::bucket::presets::total_charge_ranges;
use tabnorm::transform::{coerce_cell, Coercion};
use tabnorm::{bucket, BlankPolicy, BucketTable, OUT_OF_RANGE};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let Ok(table) = BucketTable::new(total_charge_ranges()) else {
        return;
    };

    for policy in [BlankPolicy::TreatAsMissing, BlankPolicy::Fail] {
        if let Coercion::Value(v) = coerce_cell(&raw, policy) {
            assert!(v.is_finite());
            let label = bucket(v, &table);
            assert!(label == OUT_OF_RANGE || table.labels().any(|l| l == label));
        }
    }
});
