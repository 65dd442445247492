//! CLI command implementations.

pub mod bins;
pub mod clean;
pub mod profile;

use std::path::Path;

use tabnorm::PipelineConfig;

/// Load a pipeline configuration, or the Telco preset when none is given.
pub(crate) fn load_config(path: Option<&Path>) -> tabnorm::Result<PipelineConfig> {
    match path {
        Some(path) => PipelineConfig::load(path),
        None => Ok(PipelineConfig::telco_churn()),
    }
}
