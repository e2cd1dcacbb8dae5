//! Loading of intake exports.
//!
//! The export arrives as a CSV file whose header row is the first non-blank
//! line. Every column is loaded as text so identifiers such as serial numbers
//! keep their leading zeros; typed interpretation happens later.

pub mod csv_table;
pub mod error;

pub use csv_table::{CsvTable, read_csv_dataset, read_csv_table};
pub use error::{IngestError, Result};
