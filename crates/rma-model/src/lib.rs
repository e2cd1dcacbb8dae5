pub mod error;
pub mod field;
pub mod filter;
pub mod report;
pub mod role;

pub use error::ParseError;
pub use field::{ColumnRef, SemanticField, TimePart};
pub use filter::{CategoryFilter, DateRange, FilterSpec, TextSearch};
pub use report::{ReportId, ReportOutcome, ReportParams, ReportRequest, ReportResult};
pub use role::Role;
