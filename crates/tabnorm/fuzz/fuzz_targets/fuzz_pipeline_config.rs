//! Fuzz target for pipeline configuration parsing and validation.
//!
//! Any JSON either fails to load or yields a pipeline whose bucket tables
//! were validated. Neither path may panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabnorm::{Pipeline, PipelineConfig};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = PipelineConfig::from_json(text) {
            let _ = Pipeline::new(config);
        }
    }
});
