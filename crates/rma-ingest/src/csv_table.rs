use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::*;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Raw text table read from a CSV export.
///
/// Every row has exactly `headers.len()` cells; short rows are padded with
/// empty strings and extra trailing cells are dropped.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Makes headers unique: blank headers become `column N`, repeats get a
/// ` (2)`, ` (3)`, ... suffix in declaration order.
fn disambiguate_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut unique = Vec::with_capacity(headers.len());
    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("column {}", idx + 1)
        } else {
            header
        };
        let mut candidate = base.clone();
        let mut n = 2;
        while seen.contains(&candidate) {
            candidate = format!("{base} ({n})");
            n += 1;
        }
        seen.insert(candidate.clone());
        unique.push(candidate);
    }
    unique
}

/// Reads a CSV export into a text table.
///
/// The first non-blank row is the header row. Fully blank rows are skipped.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let file = File::open(path).map_err(|e| IngestError::open(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    let mut raw_rows = raw_rows.into_iter();
    let Some(header_row) = raw_rows.next() else {
        return Ok(CsvTable {
            headers: Vec::new(),
            rows: Vec::new(),
        });
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|value| normalize_header(value))
        .collect();
    let width = headers.len();
    let rows: Vec<Vec<String>> = raw_rows
        .map(|mut row| {
            row.resize(width, String::new());
            row
        })
        .collect();
    debug!(
        path = %path.display(),
        columns = width,
        rows = rows.len(),
        "read csv table"
    );
    Ok(CsvTable { headers, rows })
}

/// Reads a CSV export into a DataFrame of nullable String columns.
///
/// Empty cells become null. Duplicate or blank headers are renamed so
/// column names stay unique.
pub fn read_csv_dataset(path: &Path) -> Result<DataFrame> {
    let table = read_csv_table(path)?;
    table_to_frame(table)
}

fn table_to_frame(table: CsvTable) -> Result<DataFrame> {
    if table.headers.is_empty() {
        return Ok(DataFrame::empty());
    }
    let headers = disambiguate_headers(table.headers);
    let mut columns = Vec::with_capacity(headers.len());
    for (idx, header) in headers.iter().enumerate() {
        let values: Vec<Option<String>> = table
            .rows
            .iter()
            .map(|row| {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                (!cell.is_empty()).then(|| cell.to_string())
            })
            .collect();
        columns.push(Series::new(header.as_str().into(), values).into_column());
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header_collapses_whitespace() {
        assert_eq!(normalize_header("\u{feff}  Khách   hàng "), "Khách hàng");
    }

    #[test]
    fn test_disambiguate_headers() {
        let headers = vec![
            "Serial".to_string(),
            String::new(),
            "Serial".to_string(),
            "Serial".to_string(),
        ];
        assert_eq!(
            disambiguate_headers(headers),
            vec!["Serial", "column 2", "Serial (2)", "Serial (3)"]
        );
    }

    #[test]
    fn test_table_to_frame_nulls_empty_cells() {
        let table = CsvTable {
            headers: vec!["A".to_string(), "B".to_string()],
            rows: vec![vec!["1".to_string(), String::new()]],
        };
        let df = table_to_frame(table).expect("frame");
        assert_eq!(df.height(), 1);
        let b = df.column("B").expect("B");
        assert_eq!(b.null_count(), 1);
    }
}
