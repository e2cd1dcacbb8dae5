use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

use rma_cli::export::{write_csv, write_csv_file};
use tempfile::TempDir;

fn result_frame() -> DataFrame {
    DataFrame::new(vec![
        Series::new("product".into(), ["Router, X", "Switch"]).into_column(),
        Series::new("count".into(), [3u32, 1]).into_column(),
        Series::new("success_rate_pct".into(), [66.7f64, 0.0]).into_column(),
        Series::new("note".into(), [Some("late"), None]).into_column(),
    ])
    .expect("df")
}

#[test]
fn table_is_written_with_header_and_quoting() {
    let mut buffer = Vec::new();
    write_csv(&result_frame(), &mut buffer).expect("write");
    let text = String::from_utf8(buffer).expect("utf8");
    insta::assert_snapshot!(text, @r#"
    product,count,success_rate_pct,note
    "Router, X",3,66.7,late
    Switch,1,0,
    "#);
}

#[test]
fn file_export_replaces_existing_file() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("result.csv");
    std::fs::write(&path, "stale").expect("seed");
    write_csv_file(&result_frame(), &path).expect("write");
    let text = std::fs::read_to_string(&path).expect("read");
    assert!(text.starts_with("product,count"));
    assert_eq!(text.lines().count(), 3);
}
