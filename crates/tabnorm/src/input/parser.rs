//! CSV/TSV loading with delimiter detection.

use std::collections::HashSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{Result, TabnormError};
use super::source::SourceMetadata;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// How many non-blank lines delimiter detection looks at.
const DETECT_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

impl ParserConfig {
    /// Force a delimiter instead of detecting one.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Stop after `max_rows` data rows.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// Loads delimited text into a [`Dataset`] of text cells.
///
/// No type guessing happens here: every cell arrives as
/// [`CellValue::Text`](crate::CellValue::Text), verbatim, and numeric
/// columns are converted by an explicit coercion pass.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Load a file and return the dataset and its provenance.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();

        let contents = fs::read(path).map_err(|e| TabnormError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let delimiter = self.resolve_delimiter(&contents)?;
        let dataset = self.parse_bytes(&contents, delimiter)?;

        let source = SourceMetadata::describe(
            path,
            &contents,
            delimiter,
            dataset.row_count(),
            dataset.column_count(),
        );

        debug!(
            file = %source.file,
            format = %source.format,
            rows = source.row_count,
            columns = source.column_count,
            "loaded source"
        );

        Ok((dataset, source))
    }

    /// Load in-memory text.
    pub fn load_str(&self, text: &str) -> Result<Dataset> {
        let bytes = text.as_bytes();
        let delimiter = self.resolve_delimiter(bytes)?;
        self.parse_bytes(bytes, delimiter)
    }

    fn resolve_delimiter(&self, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(d) if d == self.config.quote || d == b'\n' || d == b'\r' => Err(
                TabnormError::InvalidDelimiter(format!("{:?}", d as char)),
            ),
            Some(d) => Ok(d),
            None => detect_delimiter(bytes, self.config.quote),
        }
    }

    /// Parse bytes with a known delimiter.
    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };
        check_unique(&headers)?;

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }

            let record = result?;

            if headers.is_empty() && !self.config.has_header {
                headers = (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect();
            }

            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            // Ragged rows are padded or cut to the header width.
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        if headers.is_empty() {
            return Err(TabnormError::EmptyData("No columns found".to_string()));
        }
        if rows.is_empty() {
            return Err(TabnormError::EmptyData("No data rows found".to_string()));
        }

        Ok(Dataset::from_rows(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject a header that names a column twice.
fn check_unique(headers: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for header in headers {
        if !seen.insert(header.as_str()) {
            return Err(TabnormError::DuplicateColumn {
                column: header.clone(),
            });
        }
    }
    Ok(())
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .take(DETECT_LINES)
        .collect();

    if lines.is_empty() {
        return Err(TabnormError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim, quote))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance = counts
            .iter()
            .map(|&c| (c as f64 - mean).powi(2))
            .sum::<f64>()
            / counts.len() as f64;

        // Consistent per-line counts win; tab breaks ties since it rarely
        // appears inside values.
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8, quote: u8) -> usize {
    let delim_char = delimiter as char;
    let quote_char = quote as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == quote_char {
            in_quotes = !in_quotes;
        } else if ch == delim_char && !in_quotes {
            count += 1;
        }
    }

    count
}
