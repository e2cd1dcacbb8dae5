//! Error types for report execution.

use polars::prelude::PolarsError;
use rma_model::{ReportId, Role};
use thiserror::Error;

use crate::templates::Param;

/// Caller errors and frame failures raised while running a report.
///
/// Missing dataset columns are not errors; they produce
/// [`ReportOutcome::MissingColumns`](rma_model::ReportOutcome::MissingColumns).
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required parameter was not supplied.
    #[error("report '{report}' requires the '{param}' parameter")]
    MissingParameter { report: ReportId, param: Param },

    /// A parameter value is out of range.
    #[error("invalid '{param}' value {value} for report '{report}': {reason}")]
    InvalidParameter {
        report: ReportId,
        param: Param,
        value: String,
        reason: &'static str,
    },

    /// The caller's role is below the report's minimum role.
    #[error("report '{report}' requires role '{required}', caller has '{role}'")]
    InsufficientRole {
        report: ReportId,
        required: Role,
        role: Role,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {0}")]
    Polars(#[from] PolarsError),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::InsufficientRole {
            report: ReportId::StatusSummary,
            required: Role::Admin,
            role: Role::User,
        };
        assert_eq!(
            err.to_string(),
            "report 'status-summary' requires role 'admin', caller has 'user'"
        );
        let err = ReportError::MissingParameter {
            report: ReportId::ProductStatus,
            param: Param::Product,
        };
        assert_eq!(
            err.to_string(),
            "report 'product-status' requires the 'product' parameter"
        );
    }
}
