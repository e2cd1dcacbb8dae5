//! User-selected row constraints.

use chrono::NaiveDate;

use crate::field::SemanticField;

/// Inclusive intake-date window. Either bound may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Returns true when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns true when `date` lies within `[start, end]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Keep rows whose value for `field` is one of `values`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    pub field: SemanticField,
    pub values: Vec<String>,
}

/// Keep rows whose `field` text contains `keyword`, ignoring case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    pub field: SemanticField,
    pub keyword: String,
}

/// A set of independently optional constraints, combined with AND.
///
/// The default value constrains nothing and acts as the identity filter.
/// A date range with both bounds open restricts nothing and is skipped,
/// so rows without an intake date survive it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    pub date_range: Option<DateRange>,
    pub categories: Vec<CategoryFilter>,
    pub search: Vec<TextSearch>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_category<I, S>(mut self, field: SemanticField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.push(CategoryFilter {
            field,
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn with_search(mut self, field: SemanticField, keyword: impl Into<String>) -> Self {
        self.search.push(TextSearch {
            field,
            keyword: keyword.into(),
        });
        self
    }

    /// Returns true when no constraint would narrow the row set.
    pub fn is_empty(&self) -> bool {
        self.date_range.is_none_or(|range| range.is_unbounded())
            && self.categories.iter().all(|c| c.values.is_empty())
            && self.search.iter().all(|s| s.keyword.trim().is_empty())
    }

    /// Combines two specs into one that applies both sets of constraints.
    ///
    /// Date ranges intersect; category and search lists concatenate.
    pub fn and(mut self, other: FilterSpec) -> Self {
        self.date_range = match (self.date_range, other.date_range) {
            (Some(a), Some(b)) => Some(DateRange {
                start: a.start.max(b.start),
                end: match (a.end, b.end) {
                    (Some(x), Some(y)) => Some(x.min(y)),
                    (x, y) => x.or(y),
                },
            }),
            (a, b) => a.or(b),
        };
        self.categories.extend(other.categories);
        self.search.extend(other.search);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn default_spec_is_empty() {
        assert!(FilterSpec::default().is_empty());
        assert!(
            FilterSpec::new()
                .with_category(SemanticField::Technician, Vec::<String>::new())
                .with_search(SemanticField::Customer, "  ")
                .is_empty()
        );
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));
        assert!(range.contains(date(2024, 1, 1)));
        assert!(range.contains(date(2024, 1, 31)));
        assert!(!range.contains(date(2024, 2, 1)));
        assert!(DateRange::default().contains(date(1999, 12, 31)));
    }

    #[test]
    fn unbounded_date_range_is_empty() {
        assert!(DateRange::default().is_unbounded());
        assert!(FilterSpec::new().with_date_range(DateRange::default()).is_empty());
        assert!(
            !FilterSpec::new()
                .with_date_range(DateRange::new(None, Some(date(2024, 1, 31))))
                .is_empty()
        );
    }

    #[test]
    fn and_keeps_both_searches() {
        let a = FilterSpec::new().with_search(SemanticField::Customer, "acme");
        let b = FilterSpec::new().with_search(SemanticField::Product, "router");
        let combined = a.and(b);
        assert_eq!(
            combined.search,
            vec![
                TextSearch {
                    field: SemanticField::Customer,
                    keyword: "acme".to_string(),
                },
                TextSearch {
                    field: SemanticField::Product,
                    keyword: "router".to_string(),
                },
            ]
        );
        assert!(!combined.is_empty());
    }

    #[test]
    fn and_intersects_date_ranges() {
        let a = FilterSpec::new().with_date_range(DateRange::new(Some(date(2024, 1, 1)), None));
        let b = FilterSpec::new().with_date_range(DateRange::new(
            Some(date(2024, 2, 1)),
            Some(date(2024, 3, 1)),
        ));
        let combined = a.and(b);
        assert_eq!(
            combined.date_range,
            Some(DateRange::new(Some(date(2024, 2, 1)), Some(date(2024, 3, 1))))
        );
    }
}
