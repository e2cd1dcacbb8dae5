//! Header canonicalization and time-part derivation.

use std::collections::BTreeSet;

use chrono::Datelike;
use polars::prelude::{DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};
use rma_map::{ColumnResolver, fold_text};
use rma_model::{SemanticField, TimePart};
use tracing::debug;

use crate::datetime::quarter_of;
use crate::frame::{column_names, date_column};

/// Replaces every header with its folded form.
///
/// Headers that collide after folding keep declaration order and get a
/// ` (2)`, ` (3)`, ... suffix; blank headers become `column N`. The suffixed
/// forms are already folded, so applying this twice changes nothing.
pub fn canonicalize_headers(df: &DataFrame) -> PolarsResult<DataFrame> {
    let mut seen = BTreeSet::new();
    let mut renamed = Vec::with_capacity(df.width());
    for (idx, (name, column)) in column_names(df)
        .into_iter()
        .zip(df.get_columns())
        .enumerate()
    {
        let folded = fold_text(&name);
        let base = if folded.is_empty() {
            format!("column {}", idx + 1)
        } else {
            folded
        };
        let mut candidate = base.clone();
        let mut n = 2;
        while seen.contains(&candidate) {
            candidate = format!("{base} ({n})");
            n += 1;
        }
        seen.insert(candidate.clone());
        renamed.push(column.clone().with_name(candidate.into()));
    }
    DataFrame::new(renamed)
}

/// Adds `year`, `month` and `quarter` columns derived from the intake date.
///
/// Existing columns with those names are replaced. Rows whose date does not
/// parse get nulls. When the intake date does not resolve the frame is
/// returned unchanged.
pub fn derive_time_parts(df: &DataFrame, resolver: &ColumnResolver) -> PolarsResult<DataFrame> {
    let Some(date_col) = resolver.resolve_in(df, SemanticField::IntakeDate) else {
        debug!("intake date not resolved; time parts not derived");
        return Ok(df.clone());
    };
    let dates = date_column(df, &date_col)?;
    let mut years = Vec::with_capacity(dates.len());
    let mut months = Vec::with_capacity(dates.len());
    let mut quarters = Vec::with_capacity(dates.len());
    for date in &dates {
        years.push(date.map(|d| d.year()));
        months.push(date.map(|d| d.month() as i32));
        quarters.push(date.map(|d| quarter_of(d.month()) as i32));
    }
    let unparsed = dates.iter().filter(|d| d.is_none()).count();
    debug!(column = %date_col, rows = dates.len(), unparsed, "derived time parts");

    let mut out = df.clone();
    for (part, values) in [
        (TimePart::Year, years),
        (TimePart::Month, months),
        (TimePart::Quarter, quarters),
    ] {
        out.with_column(Series::new(part.column_name().into(), values).into_column())?;
    }
    Ok(out)
}

/// Canonicalizes headers, then derives time parts. Idempotent.
pub fn normalize(df: &DataFrame, resolver: &ColumnResolver) -> PolarsResult<DataFrame> {
    let canonical = canonicalize_headers(df)?;
    derive_time_parts(&canonical, resolver)
}
