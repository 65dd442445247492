//! Property-based tests for the normalization passes.
//!
//! These tests use proptest to generate random inputs and check that the
//! passes keep their invariants under all conditions.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p tabnorm --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p tabnorm --test property_tests
//! ```

use proptest::prelude::*;

use tabnorm::bucket::presets::{monthly_charge_ranges, tenure_ranges, total_charge_ranges};
use tabnorm::transform::{coerce_cell, Coercion};
use tabnorm::{
    bucket, BlankPolicy, BucketRange, BucketTable, CellValue, Dataset, Record, TabularNormalizer,
    OUT_OF_RANGE,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Service-flag values, some carrying the suffix once or more.
fn service_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("No".to_string()),
        Just("Yes".to_string()),
        Just("No internet service".to_string()),
        "[A-Za-z ]{0,12}( service){0,3}",
        "( service)[a-z]{0,5}( service)?",
    ]
}

fn cell() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        4 => service_value().prop_map(CellValue::Text),
        1 => (-1000.0f64..1000.0).prop_map(CellValue::Number),
        1 => Just(CellValue::Missing),
    ]
}

fn service_dataset() -> impl Strategy<Value = Dataset> {
    prop::collection::vec(cell(), 0..40).prop_map(|cells| {
        Dataset::with_records(
            vec!["OnlineSecurity".to_string()],
            cells
                .into_iter()
                .enumerate()
                .map(|(row, value)| Record::new(row).with("OnlineSecurity", value))
                .collect(),
        )
    })
}

/// Blank strings of assorted whitespace.
fn blank() -> impl Strategy<Value = String> {
    "[ \t\r\n]{0,6}"
}

/// Contiguous tables built from sorted, distinct cut points.
fn contiguous_table() -> impl Strategy<Value = BucketTable> {
    prop::collection::btree_set(-500i32..500, 2..12).prop_map(|cuts| {
        let cuts: Vec<f64> = cuts.into_iter().map(f64::from).collect();
        let ranges = cuts
            .windows(2)
            .enumerate()
            .map(|(i, w)| BucketRange::new(w[0], w[1], format!("b{}", i)))
            .collect();
        BucketTable::new(ranges).expect("cut points are sorted and distinct")
    })
}

// =============================================================================
// strip_suffix
// =============================================================================

proptest! {
    #[test]
    fn strip_suffix_is_idempotent(data in service_dataset()) {
        let normalizer = TabularNormalizer::new();

        let mut once = data.clone();
        normalizer.strip_suffix(&mut once, "OnlineSecurity", " service").unwrap();

        let mut twice = once.clone();
        let second = normalizer.strip_suffix(&mut twice, "OnlineSecurity", " service").unwrap();

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(second.values_changed, 0);
    }

    #[test]
    fn strip_suffix_leaves_no_suffix_behind(data in service_dataset()) {
        let mut data = data;
        let before: Vec<CellValue> = data
            .column_values("OnlineSecurity")
            .map(|v| v.cloned().unwrap_or_default())
            .collect();

        TabularNormalizer::new()
            .strip_suffix(&mut data, "OnlineSecurity", " service")
            .unwrap();

        for (old, new) in before.iter().zip(data.column_values("OnlineSecurity")) {
            let new = new.cloned().unwrap_or_default();
            match (old, &new) {
                (CellValue::Text(_), CellValue::Text(s)) => prop_assert!(!s.contains(" service")),
                _ => prop_assert_eq!(old, &new),
            }
        }
    }
}

// =============================================================================
// Coercion
// =============================================================================

proptest! {
    #[test]
    fn blank_becomes_missing_never_a_number(raw in blank()) {
        prop_assert_eq!(coerce_cell(&raw, BlankPolicy::TreatAsMissing), Coercion::Missing);
        prop_assert!(!matches!(coerce_cell(&raw, BlankPolicy::Fail), Coercion::Value(_)));
    }

    #[test]
    fn rendered_finite_numbers_parse_exactly(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        prop_assert_eq!(coerce_cell(&value.to_string(), BlankPolicy::Fail), Coercion::Value(value));
    }

    #[test]
    fn two_decimal_charges_parse_to_nearest_double(whole in 0u32..10_000, cents in 0u32..100) {
        let raw = format!("{}.{:02}", whole, cents);
        let expected: f64 = raw.parse().unwrap();
        prop_assert_eq!(coerce_cell(&format!(" {} ", raw), BlankPolicy::Fail), Coercion::Value(expected));
    }

    #[test]
    fn coercion_never_panics(raw in "\\PC{0,30}") {
        let _ = coerce_cell(&raw, BlankPolicy::TreatAsMissing);
    }

    #[test]
    fn coerced_column_has_no_text_left(raws in prop::collection::vec("[0-9. a-z-]{0,8}", 0..30)) {
        let mut data = Dataset::with_records(
            vec!["TotalCharges".to_string()],
            raws.iter()
                .enumerate()
                .map(|(row, raw)| Record::new(row).with("TotalCharges", raw.as_str()))
                .collect(),
        );

        let result = TabularNormalizer::new()
            .coerce_numeric(&mut data, "TotalCharges", BlankPolicy::TreatAsMissing)
            .unwrap();

        let missing = data
            .column_values("TotalCharges")
            .filter(|v| v.is_some_and(|v| v.is_missing()))
            .count();
        prop_assert!(data
            .column_values("TotalCharges")
            .all(|v| !matches!(v, Some(CellValue::Text(_)))));
        prop_assert!(result.failures.len() <= missing);
    }
}

// =============================================================================
// Buckets
// =============================================================================

proptest! {
    #[test]
    fn every_value_gets_exactly_one_label(table in contiguous_table(), value in -600.0f64..600.0) {
        let containing: Vec<&BucketRange> =
            table.ranges().iter().filter(|r| r.contains(value)).collect();
        let label = bucket(value, &table);

        prop_assert!(containing.len() <= 1);
        match containing.first() {
            Some(range) => prop_assert_eq!(label, range.label.as_str()),
            None => {
                prop_assert_eq!(label, OUT_OF_RANGE);
                prop_assert!(value < table.lower_bound() || value >= table.upper_bound());
            }
        }
    }

    #[test]
    fn preset_tables_cover_their_span(value in 0.0f64..10_000.0) {
        let totals = BucketTable::new(total_charge_ranges()).unwrap();
        prop_assert_ne!(bucket(value, &totals), OUT_OF_RANGE);

        let monthly = BucketTable::new(monthly_charge_ranges()).unwrap();
        if value < 126.0 {
            prop_assert_ne!(bucket(value, &monthly), OUT_OF_RANGE);
        }

        let tenure = BucketTable::new(tenure_ranges()).unwrap();
        if (1.0..73.0).contains(&value) {
            prop_assert_ne!(bucket(value, &tenure), OUT_OF_RANGE);
        }
    }

    #[test]
    fn range_order_does_not_matter(table in contiguous_table(), value in -600.0f64..600.0) {
        let mut reversed = table.ranges().to_vec();
        reversed.reverse();
        let rebuilt = BucketTable::new(reversed).unwrap();
        prop_assert_eq!(bucket(value, &table), bucket(value, &rebuilt));
    }
}

// =============================================================================
// drop_incomplete
// =============================================================================

proptest! {
    #[test]
    fn drop_incomplete_keeps_complete_rows_in_order(cells in prop::collection::vec(cell(), 0..40)) {
        let mut data = Dataset::with_records(
            vec!["TotalCharges".to_string()],
            cells
                .into_iter()
                .enumerate()
                .map(|(row, value)| Record::new(row).with("TotalCharges", value))
                .collect(),
        );
        let expected: Vec<usize> = data
            .records()
            .iter()
            .filter(|r| r.has_value("TotalCharges"))
            .map(|r| r.row)
            .collect();

        let report = TabularNormalizer::new()
            .drop_incomplete(&mut data, &["TotalCharges"])
            .unwrap();

        let kept: Vec<usize> = data.records().iter().map(|r| r.row).collect();
        prop_assert_eq!(&kept, &expected);
        prop_assert_eq!(report.dropped + kept.len(), report.rows.len() + data.row_count());
        prop_assert!(report.rows.iter().all(|row| !kept.contains(row)));
    }
}
