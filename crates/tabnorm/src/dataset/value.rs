//! Cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell of a record.
///
/// `Missing` is the distinguished null marker. It is never zero and never
/// a value copied from a neighbouring column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Parsed numeric value.
    Number(f64),
    /// Raw or normalized text.
    Text(String),
    /// No value.
    Missing,
}

impl CellValue {
    /// Returns true if this is the missing marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Get the numeric value, if this cell holds one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the text value, if this cell holds one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Render the cell as it would appear in delimited output.
    ///
    /// Numbers use the shortest round-trip form (`1.0` renders as `1`,
    /// `29.85` as `29.85`); missing renders as the empty string.
    pub fn render(&self) -> String {
        match self {
            CellValue::Number(n) => format!("{}", n),
            CellValue::Text(s) => s.clone(),
            CellValue::Missing => String::new(),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Missing
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Missing => write!(f, "<missing>"),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Missing)
    }
}
