//! Multi-criterion row filtering.
//!
//! Constraints are resolved against the dataset's headers and combined with
//! AND. A constraint whose column cannot be found does not narrow the rows;
//! it is returned as an [`IgnoredConstraint`] and logged instead.

use std::fmt;

use polars::prelude::{DataFrame, PolarsResult};
use rma_map::ColumnResolver;
use rma_model::{CategoryFilter, DateRange, FilterSpec, SemanticField, TextSearch};
use tracing::{debug, warn};

use crate::frame::{date_column, filter_rows, raw_text_column, text_column};

/// A constraint skipped because its column did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoredConstraint {
    DateRange,
    Category { field: SemanticField },
    Search { field: SemanticField },
}

impl IgnoredConstraint {
    /// The field whose column could not be found.
    pub fn field(&self) -> SemanticField {
        match self {
            IgnoredConstraint::DateRange => SemanticField::IntakeDate,
            IgnoredConstraint::Category { field } | IgnoredConstraint::Search { field } => *field,
        }
    }
}

impl fmt::Display for IgnoredConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoredConstraint::DateRange => write!(f, "date range on {}", self.field()),
            IgnoredConstraint::Category { field } => write!(f, "category filter on {field}"),
            IgnoredConstraint::Search { field } => write!(f, "text search on {field}"),
        }
    }
}

/// Filtered rows plus the constraints that could not be applied.
#[derive(Debug, Clone)]
pub struct FilteredDataset {
    pub data: DataFrame,
    pub ignored: Vec<IgnoredConstraint>,
}

/// Applies `spec` and returns the surviving rows.
pub fn apply_filter(
    df: &DataFrame,
    spec: &FilterSpec,
    resolver: &ColumnResolver,
) -> PolarsResult<DataFrame> {
    Ok(apply_filter_with_report(df, spec, resolver)?.data)
}

/// Applies `spec`, reporting constraints whose column did not resolve.
pub fn apply_filter_with_report(
    df: &DataFrame,
    spec: &FilterSpec,
    resolver: &ColumnResolver,
) -> PolarsResult<FilteredDataset> {
    if spec.is_empty() {
        return Ok(FilteredDataset {
            data: df.clone(),
            ignored: Vec::new(),
        });
    }
    let mut keep = vec![true; df.height()];
    let mut ignored = Vec::new();

    if let Some(range) = &spec.date_range
        && !range.is_unbounded()
        && !keep_date_range(df, range, resolver, &mut keep)?
    {
        ignored.push(IgnoredConstraint::DateRange);
    }
    for category in &spec.categories {
        if category.values.is_empty() {
            continue;
        }
        if !keep_category(df, category, resolver, &mut keep)? {
            ignored.push(IgnoredConstraint::Category {
                field: category.field,
            });
        }
    }
    for search in &spec.search {
        if search.keyword.trim().is_empty() {
            continue;
        }
        if !keep_search(df, search, resolver, &mut keep)? {
            ignored.push(IgnoredConstraint::Search {
                field: search.field,
            });
        }
    }

    for constraint in &ignored {
        warn!(constraint = %constraint, "column not found; filter constraint ignored");
    }
    let data = filter_rows(df, &keep)?;
    debug!(
        rows_in = df.height(),
        rows_out = data.height(),
        ignored = ignored.len(),
        "applied filter"
    );
    Ok(FilteredDataset { data, ignored })
}

/// Narrows `keep` by the date range. Returns false when the column is missing.
fn keep_date_range(
    df: &DataFrame,
    range: &DateRange,
    resolver: &ColumnResolver,
    keep: &mut [bool],
) -> PolarsResult<bool> {
    let Some(column) = resolver.resolve_in(df, SemanticField::IntakeDate) else {
        return Ok(false);
    };
    for (slot, date) in keep.iter_mut().zip(date_column(df, &column)?) {
        *slot &= date.is_some_and(|d| range.contains(d));
    }
    Ok(true)
}

fn keep_category(
    df: &DataFrame,
    category: &CategoryFilter,
    resolver: &ColumnResolver,
    keep: &mut [bool],
) -> PolarsResult<bool> {
    let Some(column) = resolver.resolve_in(df, category.field) else {
        return Ok(false);
    };
    let allowed: Vec<&str> = category.values.iter().map(|v| v.trim()).collect();
    for (slot, value) in keep.iter_mut().zip(text_column(df, &column)?) {
        *slot &= value.is_some_and(|v| allowed.contains(&v.as_str()));
    }
    Ok(true)
}

fn keep_search(
    df: &DataFrame,
    search: &TextSearch,
    resolver: &ColumnResolver,
    keep: &mut [bool],
) -> PolarsResult<bool> {
    let Some(column) = resolver.resolve_in(df, search.field) else {
        return Ok(false);
    };
    let needle = search.keyword.trim().to_lowercase();
    for (slot, value) in keep.iter_mut().zip(raw_text_column(df, &column)?) {
        *slot &= value.is_some_and(|v| v.to_lowercase().contains(&needle));
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ignored_constraint_display() {
        assert_eq!(
            IgnoredConstraint::DateRange.to_string(),
            "date range on intake-date"
        );
        assert_eq!(
            IgnoredConstraint::Search {
                field: SemanticField::Serial
            }
            .to_string(),
            "text search on serial"
        );
    }
}
