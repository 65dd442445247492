//! JSON files for pipeline configurations and reports.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::bucket::BucketTable;
use crate::error::{Result, TabnormError};

use super::config::{PipelineConfig, PipelineStep};
use super::report::NormalizationReport;

impl PipelineConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tabnorm::PipelineConfig;
    /// let config = PipelineConfig::load("churn.pipeline.json").unwrap();
    /// println!("{} steps", config.steps.len());
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| TabnormError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            TabnormError::Config(format!(
                "Failed to parse pipeline '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    ///
    /// Bucket ranges are validated first, so a saved file always loads.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        for step in &self.steps {
            if let PipelineStep::Bucket { target, ranges, .. } = step {
                BucketTable::new(ranges.clone()).map_err(|e| {
                    TabnormError::Config(format!("bucket '{}': {}", target, e))
                })?;
            }
        }
        write_json(path.as_ref(), self)
    }
}

impl NormalizationReport {
    /// Save the report as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), self)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let io_err = |e: std::io::Error| TabnormError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let file = File::create(path).map_err(io_err)?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}

/// Default report path for a data file: `<stem>.report.json` beside it.
///
/// # Example
///
/// ```
/// use tabnorm::pipeline::report_path;
///
/// let path = report_path("data/churn.csv");
/// assert_eq!(path.to_string_lossy(), "data/churn.report.json");
/// ```
pub fn report_path(data_path: impl AsRef<Path>) -> PathBuf {
    beside(data_path.as_ref(), |stem| format!("{}.report.json", stem))
}

/// Default cleaned-output path for a data file: `<stem>_clean.csv` beside it.
pub fn cleaned_path(data_path: impl AsRef<Path>) -> PathBuf {
    beside(data_path.as_ref(), |stem| format!("{}_clean.csv", stem))
}

fn beside(data_path: &Path, name: impl Fn(&str) -> String) -> PathBuf {
    let stem = data_path.file_stem().unwrap_or_default().to_string_lossy();
    let parent = data_path.parent().unwrap_or(Path::new("."));

    parent.join(name(&stem))
}
