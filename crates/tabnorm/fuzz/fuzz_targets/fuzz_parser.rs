//! Fuzz target for the data parser and the Telco preset.
//!
//! This fuzzer checks that loading arbitrary bytes and running the preset
//! over whatever loads never panics. Errors are fine.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;
use tabnorm::{Parser, Pipeline};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let parser = Parser::new();
            if let Ok((dataset, _)) = parser.load_file(temp_file.path()) {
                if let Ok(pipeline) = Pipeline::telco_churn() {
                    let _ = pipeline.run(dataset);
                }
            }
        }
    }
});
