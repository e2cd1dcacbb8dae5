use chrono::NaiveDate;
use polars::prelude::*;
use proptest::prelude::*;

use rma_map::ColumnResolver;
use rma_model::{DateRange, FilterSpec, SemanticField};
use rma_transform::frame::{column_names, text_column};
use rma_transform::{IgnoredConstraint, apply_filter, apply_filter_with_report, normalize};

fn test_df(columns: Vec<(&str, Vec<&str>)>) -> DataFrame {
    let cols = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();
    DataFrame::new(cols).expect("df")
}

fn intake_df() -> DataFrame {
    test_df(vec![
        ("Khách Hàng", vec!["Acme", "Beta", "Acme", "Gamma"]),
        ("Sản phẩm", vec!["Router X", "Switch", "Router Y", "Router X"]),
        (
            "Ngày tiếp nhận",
            vec!["2024-01-10", "15/02/2024", "", "2024-03-01"],
        ),
        ("Serial", vec!["SN-001", "SN-002", "sn-003", "SN-004"]),
    ])
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn customers(df: &DataFrame) -> Vec<String> {
    let resolver = ColumnResolver::new();
    let column = resolver
        .resolve_in(df, SemanticField::Customer)
        .expect("customer column");
    text_column(df, &column)
        .expect("customers")
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect()
}

#[test]
fn normalize_folds_headers_and_adds_time_parts() {
    let out = normalize(&intake_df(), &ColumnResolver::new()).expect("normalize");
    assert_eq!(
        column_names(&out),
        vec![
            "khach hang",
            "san pham",
            "ngay tiep nhan",
            "serial",
            "year",
            "month",
            "quarter"
        ]
    );
    let quarter = out.column("quarter").expect("quarter");
    assert_eq!(quarter.get(1).expect("row"), AnyValue::Int32(1));
    assert_eq!(quarter.get(2).expect("row"), AnyValue::Null);
}

#[test]
fn normalize_is_idempotent_on_intake_sheet() {
    let resolver = ColumnResolver::new();
    let once = normalize(&intake_df(), &resolver).expect("once");
    let twice = normalize(&once, &resolver).expect("twice");
    assert_eq!(column_names(&once), column_names(&twice));
    assert!(once.equals_missing(&twice));
}

#[test]
fn empty_filter_is_identity() {
    let df = intake_df();
    let out = apply_filter(&df, &FilterSpec::default(), &ColumnResolver::new()).expect("filter");
    assert!(out.equals_missing(&df));
}

#[test]
fn date_range_excludes_unparseable_dates() {
    let spec = FilterSpec::new().with_date_range(DateRange::new(date(2024, 1, 1), None));
    let out = apply_filter(&intake_df(), &spec, &ColumnResolver::new()).expect("filter");
    assert_eq!(customers(&out), vec!["Acme", "Beta", "Gamma"]);
}

#[test]
fn date_range_bounds_are_inclusive() {
    let spec = FilterSpec::new().with_date_range(DateRange::new(
        date(2024, 2, 15),
        date(2024, 3, 1),
    ));
    let out = apply_filter(&intake_df(), &spec, &ColumnResolver::new()).expect("filter");
    assert_eq!(customers(&out), vec!["Beta", "Gamma"]);
}

#[test]
fn category_values_are_or_combined() {
    let spec = FilterSpec::new().with_category(SemanticField::Customer, ["Beta", "Gamma"]);
    let out = apply_filter(&intake_df(), &spec, &ColumnResolver::new()).expect("filter");
    assert_eq!(customers(&out), vec!["Beta", "Gamma"]);
}

#[test]
fn search_is_case_insensitive() {
    let spec = FilterSpec::new().with_search(SemanticField::Serial, "sn-00");
    let out = apply_filter(&intake_df(), &spec, &ColumnResolver::new()).expect("filter");
    assert_eq!(out.height(), 4);

    let spec = FilterSpec::new().with_search(SemanticField::Product, "ROUTER");
    let out = apply_filter(&intake_df(), &spec, &ColumnResolver::new()).expect("filter");
    assert_eq!(customers(&out), vec!["Acme", "Acme", "Gamma"]);
}

#[test]
fn combined_spec_equals_sequential_application() {
    let resolver = ColumnResolver::new();
    let df = intake_df();
    let a = FilterSpec::new().with_category(SemanticField::Customer, ["Acme", "Gamma"]);
    let b = FilterSpec::new().with_search(SemanticField::Product, "router x");

    let sequential = apply_filter(
        &apply_filter(&df, &a, &resolver).expect("a"),
        &b,
        &resolver,
    )
    .expect("b");
    let combined = apply_filter(&df, &a.and(b), &resolver).expect("a and b");
    assert!(sequential.equals_missing(&combined));
    assert_eq!(customers(&combined), vec!["Acme", "Gamma"]);

    let c = FilterSpec::new().with_search(SemanticField::Customer, "acme");
    let d = FilterSpec::new().with_search(SemanticField::Product, "router x");
    let sequential = apply_filter(
        &apply_filter(&df, &c, &resolver).expect("c"),
        &d,
        &resolver,
    )
    .expect("d");
    let combined = apply_filter(&df, &c.and(d), &resolver).expect("c and d");
    assert!(sequential.equals_missing(&combined));
    assert_eq!(customers(&combined), vec!["Acme"]);
}

#[test]
fn unbounded_date_range_keeps_undated_rows() {
    let df = intake_df();
    let spec = FilterSpec::new().with_date_range(DateRange::default());
    let filtered = apply_filter_with_report(&df, &spec, &ColumnResolver::new()).expect("filter");
    assert!(filtered.data.equals_missing(&df));
    assert!(filtered.ignored.is_empty());
}

#[test]
fn unresolved_search_is_ignored_and_reported() {
    let df = intake_df();
    let spec = FilterSpec::new().with_search(SemanticField::Technician, "Minh");
    let filtered = apply_filter_with_report(&df, &spec, &ColumnResolver::new()).expect("filter");
    assert!(filtered.data.equals_missing(&df));
    assert_eq!(
        filtered.ignored,
        vec![IgnoredConstraint::Search {
            field: SemanticField::Technician
        }]
    );
}

#[test]
fn empty_category_set_is_a_no_op() {
    let df = intake_df();
    let spec = FilterSpec::new().with_category(SemanticField::Technician, Vec::<String>::new());
    let filtered = apply_filter_with_report(&df, &spec, &ColumnResolver::new()).expect("filter");
    assert!(filtered.data.equals_missing(&df));
    assert!(filtered.ignored.is_empty());
}

fn header_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-zA-Zàáđ _.-]{1,10}", 1..5)
        .prop_map(|set| set.into_iter().collect())
}

proptest! {
    #[test]
    fn normalize_is_idempotent(
        headers in header_strategy(),
        dates in prop::collection::vec(
            prop::sample::select(vec!["2024-01-10", "10/11/2023", "", "bad", "2023-12-31 08:00"]),
            0..6,
        ),
    ) {
        let rows = dates.len();
        let mut columns = vec![Series::new("Ngày tiếp nhận".into(), dates.clone()).into_column()];
        for header in &headers {
            let values: Vec<&str> = (0..rows).map(|_| "x").collect();
            columns.push(Series::new(header.as_str().into(), values).into_column());
        }
        let df = DataFrame::new(columns).expect("df");
        let resolver = ColumnResolver::new();
        let once = normalize(&df, &resolver).expect("once");
        let twice = normalize(&once, &resolver).expect("twice");
        prop_assert_eq!(column_names(&once), column_names(&twice));
        prop_assert!(once.equals_missing(&twice));
    }
}
