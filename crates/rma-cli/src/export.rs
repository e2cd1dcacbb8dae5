//! CSV export of report tables.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, DataFrame};
use rma_common::any_to_string;

/// Writes `df` as CSV with a header row. Nulls become empty cells.
pub fn write_csv<W: Write>(df: &DataFrame, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    let columns = df.get_columns();
    out.write_record(columns.iter().map(|column| column.name().as_str()))
        .context("write header")?;
    for row in 0..df.height() {
        let record: Vec<String> = columns
            .iter()
            .map(|column| any_to_string(column.get(row).unwrap_or(AnyValue::Null)))
            .collect();
        out.write_record(&record)
            .with_context(|| format!("write row {}", row + 1))?;
    }
    out.flush().context("flush csv")?;
    Ok(())
}

/// Writes `df` to a CSV file at `path`, replacing any existing file.
pub fn write_csv_file(df: &DataFrame, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("create {}", path.display()))?;
    write_csv(df, file).with_context(|| format!("write {}", path.display()))
}
