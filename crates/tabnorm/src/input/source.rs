//! Provenance of a loaded file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Where a dataset came from, so a cleaning report can be tied to its input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without directories.
    pub file: String,
    pub path: PathBuf,
    /// `sha256:`-prefixed digest of the raw bytes.
    pub hash: String,
    pub size_bytes: u64,
    /// `csv`, `tsv`, `csv-semicolon`, `psv` or `delimited`.
    pub format: String,
    /// Delimiter byte actually used, as a character.
    pub delimiter: char,
    /// Data rows loaded (header excluded).
    pub row_count: usize,
    pub column_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe `contents` read from `path` and split on `delimiter`.
    pub fn describe(
        path: &Path,
        contents: &[u8],
        delimiter: u8,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path: path.to_path_buf(),
            hash: content_hash(contents),
            size_bytes: contents.len() as u64,
            format: format_name(delimiter).to_string(),
            delimiter: delimiter as char,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Hash file contents for provenance.
pub(crate) fn content_hash(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    format!("sha256:{:x}", hasher.finalize())
}

/// Name the format implied by a delimiter.
pub(crate) fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe() {
        let meta = SourceMetadata::describe(
            Path::new("/data/churn.csv"),
            b"a,b\n1,2\n",
            b',',
            1,
            2,
        );

        assert_eq!(meta.file, "churn.csv");
        assert_eq!(meta.format, "csv");
        assert_eq!(meta.size_bytes, 8);
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(meta.hash.len(), "sha256:".len() + 64);
    }

    #[test]
    fn test_hash_is_stable() {
        assert_eq!(content_hash(b"x"), content_hash(b"x"));
        assert_ne!(content_hash(b"x"), content_hash(b"y"));
    }
}
