//! Report requests and results.

use std::fmt;
use std::str::FromStr;

use polars::prelude::DataFrame;

use crate::error::ParseError;
use crate::field::{ColumnRef, TimePart};

macro_rules! report_ids {
    ($($variant:ident => $id:literal),+ $(,)?) => {
        /// Identifier of a report template in the catalog.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum ReportId {
            $($variant),+
        }

        impl ReportId {
            /// Every report, in catalog order.
            pub const ALL: &'static [ReportId] = &[$(ReportId::$variant),+];

            /// Stable kebab-case identifier.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ReportId::$variant => $id),+
                }
            }
        }
    };
}

report_ids! {
    TotalByTime => "total-by-time",
    SuccessRateByTime => "success-rate-by-time",
    UnrepairedProducts => "unrepaired-products",
    TopCustomers => "top-customers",
    TopProductsByCustomer => "top-products-by-customer",
    TotalByCustomerAndTime => "total-by-customer-and-time",
    TopProducts => "top-products",
    TopRejectedProducts => "top-rejected-products",
    ProductStatus => "product-status",
    TopErrors => "top-errors",
    TopErrorsByProduct => "top-errors-by-product",
    TopErrorsByCustomerProduct => "top-errors-by-customer-product",
    StatusSummary => "status-summary",
    OverallSuccessRate => "overall-success-rate",
    RejectedProducts => "rejected-products",
    TopCustomersByProduct => "top-customers-by-product",
    TopErrorsByCustomerQuarter => "top-errors-by-customer-quarter",
    SuccessRateByCustomerProductMonth => "success-rate-by-customer-product-month",
    TopTechnicians => "top-technicians",
    TechnicianSuccessRateByTime => "technician-success-rate-by-time",
    TechnicianSummary => "technician-summary",
    SuccessRateByProduct => "success-rate-by-product",
    CountByProduct => "count-by-product",
    AvgProcessingTime => "avg-processing-time",
    TopProductsInGroup => "top-products-in-group",
    AvgProcessingTimeByCustomer => "avg-processing-time-by-customer",
    RepeatedSerials => "repeated-serials",
    ProductVolume => "product-volume",
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        ReportId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| ParseError::UnknownReport(s.to_string()))
    }
}

/// Template-specific parameters. Each template reads only the ones it needs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportParams {
    pub group_by: Option<TimePart>,
    pub customer: Option<String>,
    pub product: Option<String>,
    pub product_group: Option<String>,
    pub month: Option<u32>,
    pub quarter: Option<u32>,
    pub top_n: Option<usize>,
}

/// A single report invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub id: ReportId,
    pub params: ReportParams,
}

impl ReportRequest {
    pub fn new(id: ReportId) -> Self {
        Self {
            id,
            params: ReportParams::default(),
        }
    }

    pub fn with_params(mut self, params: ReportParams) -> Self {
        self.params = params;
        self
    }

    pub fn group_by(mut self, part: TimePart) -> Self {
        self.params.group_by = Some(part);
        self
    }

    pub fn customer(mut self, name: impl Into<String>) -> Self {
        self.params.customer = Some(name.into());
        self
    }

    pub fn product(mut self, name: impl Into<String>) -> Self {
        self.params.product = Some(name.into());
        self
    }

    pub fn product_group(mut self, name: impl Into<String>) -> Self {
        self.params.product_group = Some(name.into());
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.params.month = Some(month);
        self
    }

    pub fn quarter(mut self, quarter: u32) -> Self {
        self.params.quarter = Some(quarter);
        self
    }

    pub fn top_n(mut self, n: usize) -> Self {
        self.params.top_n = Some(n);
        self
    }
}

/// What a report produced.
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    /// A computed table with at least one row.
    Table(DataFrame),
    /// The computation ran but matched no data.
    Empty,
    /// Required columns could not be resolved; nothing was computed.
    MissingColumns(Vec<ColumnRef>),
}

/// A titled report outcome.
#[derive(Debug, Clone)]
pub struct ReportResult {
    pub title: String,
    pub outcome: ReportOutcome,
}

impl ReportResult {
    /// Wraps a frame, turning a zero-row frame into [`ReportOutcome::Empty`].
    pub fn from_frame(title: impl Into<String>, frame: DataFrame) -> Self {
        let outcome = if frame.height() == 0 {
            ReportOutcome::Empty
        } else {
            ReportOutcome::Table(frame)
        };
        Self {
            title: title.into(),
            outcome,
        }
    }

    pub fn missing(title: impl Into<String>, columns: Vec<ColumnRef>) -> Self {
        Self {
            title: title.into(),
            outcome: ReportOutcome::MissingColumns(columns),
        }
    }

    /// The result table, when one was computed.
    pub fn table(&self) -> Option<&DataFrame> {
        match &self.outcome {
            ReportOutcome::Table(frame) => Some(frame),
            _ => None,
        }
    }

    /// Columns that prevented the report from running.
    pub fn missing_columns(&self) -> Option<&[ColumnRef]> {
        match &self.outcome {
            ReportOutcome::MissingColumns(columns) => Some(columns),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.outcome, ReportOutcome::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::SemanticField;

    #[test]
    fn report_ids_are_unique_and_parse() {
        let mut seen = std::collections::BTreeSet::new();
        for id in ReportId::ALL {
            assert!(seen.insert(id.as_str()), "duplicate id {id}");
            assert_eq!(id.as_str().parse::<ReportId>(), Ok(*id));
        }
        assert_eq!(
            "TOP_CUSTOMERS".parse::<ReportId>(),
            Ok(ReportId::TopCustomers)
        );
    }

    #[test]
    fn zero_row_frame_becomes_empty() {
        let result = ReportResult::from_frame("nothing", DataFrame::empty());
        assert!(result.is_empty());
        assert!(result.table().is_none());
    }

    #[test]
    fn missing_columns_are_exposed_without_title_inspection() {
        let result = ReportResult::missing("x", vec![SemanticField::Repaired.into()]);
        assert_eq!(
            result.missing_columns(),
            Some(&[ColumnRef::Field(SemanticField::Repaired)][..])
        );
    }
}
