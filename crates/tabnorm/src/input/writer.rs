//! Write a dataset back out as delimited text.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::dataset::Dataset;
use crate::error::{Result, TabnormError};

/// Write the dataset as CSV with a header row.
///
/// Cells are rendered with [`CellValue::render`](crate::CellValue::render):
/// numbers in shortest round-trip form, missing as an empty field.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut out = csv::WriterBuilder::new().from_writer(writer);

    out.write_record(dataset.columns())?;
    for record in dataset.records() {
        let row: Vec<String> = dataset
            .columns()
            .iter()
            .map(|column| record.get(column).map(|v| v.render()).unwrap_or_default())
            .collect();
        out.write_record(&row)?;
    }

    out.flush().map_err(|e| TabnormError::Csv(e.into()))?;
    Ok(())
}

impl Dataset {
    /// Save the dataset to a CSV file, creating parent directories.
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |e: std::io::Error| TabnormError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = File::create(path).map_err(io_err)?;
        write_csv(self, BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CellValue, Record};

    #[test]
    fn test_write_csv() {
        let dataset = Dataset::from_records(vec![
            Record::new(0)
                .with("tenure", 1.0)
                .with("TotalCharges", 29.85)
                .with("Churn", "No"),
            Record::new(1)
                .with("tenure", 2.0)
                .with("TotalCharges", CellValue::Missing)
                .with("Churn", "Yes, soon"),
        ]);

        let mut buf = Vec::new();
        write_csv(&dataset, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "tenure,TotalCharges,Churn\n1,29.85,No\n2,,\"Yes, soon\"\n"
        );
    }
}
