//! Row-wise access to DataFrame columns.
//!
//! Datasets are small exports, so report code walks rows with `AnyValue`
//! rather than building lazy plans.

use chrono::NaiveDate;
use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray, PolarsResult};
use rma_common::{any_is_flag_set, any_to_string, any_to_text};

use crate::datetime::parse_date;

/// Column names in declaration order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names_owned()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.column(name).is_ok()
}

/// Trimmed text values; null and blank cells are `None`.
pub fn text_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_text(series.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

/// Raw text form of each cell; null cells are `None`.
pub fn raw_text_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = series.get(idx).unwrap_or(AnyValue::Null);
        values.push((!value.is_null()).then(|| any_to_string(value)));
    }
    Ok(values)
}

/// Outcome flags; a cell counts as set only when it holds the value 1.
pub fn flag_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<bool>> {
    let series = df.column(name)?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_is_flag_set(series.get(idx).unwrap_or(AnyValue::Null)));
    }
    Ok(values)
}

/// Parsed dates; unparseable cells are `None`.
pub fn date_column(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<NaiveDate>>> {
    Ok(text_column(df, name)?
        .into_iter()
        .map(|value| value.as_deref().and_then(parse_date))
        .collect())
}

/// Returns a new frame holding the rows where `keep` is true.
pub fn filter_rows(df: &DataFrame, keep: &[bool]) -> PolarsResult<DataFrame> {
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    df.filter(&mask)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, DataType, IntoColumn, NamedFrom, Series};

    use super::*;

    fn frame() -> DataFrame {
        let flags = Series::new("flag".into(), &["1", "0", "1.0"]).into_column();
        let names = Series::new("name".into(), &[Some(" Acme "), None, Some("  ")]).into_column();
        let dates = Series::new("date".into(), &["2024-01-15", "bad", "15/02/2024"]).into_column();
        DataFrame::new(vec![flags, names, dates]).expect("frame")
    }

    #[test]
    fn test_text_column_trims_and_drops_blank() {
        let values = text_column(&frame(), "name").expect("name");
        assert_eq!(values, vec![Some("Acme".to_string()), None, None]);
    }

    #[test]
    fn test_flag_column() {
        assert_eq!(
            flag_column(&frame(), "flag").expect("flag"),
            vec![true, false, true]
        );
    }

    #[test]
    fn test_date_column() {
        let dates = date_column(&frame(), "date").expect("date");
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(dates[1], None);
        assert_eq!(dates[2], NaiveDate::from_ymd_opt(2024, 2, 15));
    }

    #[test]
    fn test_filter_rows() {
        let filtered = filter_rows(&frame(), &[true, false, true]).expect("filter");
        assert_eq!(filtered.height(), 2);
        let flag: &Column = filtered.column("flag").expect("flag");
        assert_eq!(flag.dtype(), &DataType::String);
    }

    #[test]
    fn test_missing_column_is_error() {
        assert!(text_column(&frame(), "nope").is_err());
        assert!(!has_column(&frame(), "nope"));
    }
}
