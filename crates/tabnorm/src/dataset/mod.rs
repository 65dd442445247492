//! In-memory tabular data: cells, records and datasets.

mod record;
mod table;
mod value;

pub use record::Record;
pub use table::Dataset;
pub use value::CellValue;
