use std::fs;
use std::path::PathBuf;

use polars::prelude::*;
use rma_ingest::{IngestError, read_csv_dataset, read_csv_table};
use tempfile::TempDir;

fn temp_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write file");
    path
}

#[test]
fn reads_table_skipping_blank_rows() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(
        &dir,
        "rma.csv",
        "\u{feff}Khách hàng , Sản phẩm,Serial\n,,\nAcme,Router X,0012\nBeta,Switch\n",
    );
    let table = read_csv_table(&path).expect("read csv");
    assert_eq!(table.headers, vec!["Khách hàng", "Sản phẩm", "Serial"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0], vec!["Acme", "Router X", "0012"]);
    assert_eq!(table.rows[1], vec!["Beta", "Switch", ""]);
}

#[test]
fn dataset_columns_are_text_with_nulls() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "rma.csv", "Serial,Đã sửa xong\n0012,1\n0013,\n");
    let df = read_csv_dataset(&path).expect("read dataset");
    assert_eq!(df.shape(), (2, 2));

    let serial = df.column("Serial").expect("serial");
    assert_eq!(serial.dtype(), &DataType::String);
    assert_eq!(
        serial.get(0).expect("row 0"),
        AnyValue::String("0012"),
        "leading zeros survive"
    );

    let repaired = df.column("Đã sửa xong").expect("repaired");
    assert_eq!(repaired.null_count(), 1);
}

#[test]
fn duplicate_headers_are_disambiguated() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "dup.csv", "Serial,Serial,Ghi chú\nA,B,C\n");
    let df = read_csv_dataset(&path).expect("read dataset");
    let names: Vec<String> = df
        .get_column_names_owned()
        .into_iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["Serial", "Serial (2)", "Ghi chú"]);
}

#[test]
fn empty_file_gives_empty_frame() {
    let dir = TempDir::new().expect("temp dir");
    let path = temp_file(&dir, "empty.csv", "\n\n");
    let df = read_csv_dataset(&path).expect("read dataset");
    assert_eq!(df.width(), 0);
    assert_eq!(df.height(), 0);
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    let err = read_csv_dataset(&dir.path().join("nope.csv")).expect_err("missing");
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}
