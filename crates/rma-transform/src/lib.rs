//! Dataset preparation for RMA reports.
//!
//! - **frame**: row-wise column extraction and row selection helpers
//! - **datetime**: lenient date parsing for intake and return dates
//! - **normalize**: header canonicalization and year/month/quarter derivation
//! - **filter**: date range, category and substring constraints

pub mod datetime;
pub mod filter;
pub mod frame;
pub mod normalize;

pub use datetime::parse_date;
pub use filter::{FilteredDataset, IgnoredConstraint, apply_filter, apply_filter_with_report};
pub use normalize::{canonicalize_headers, derive_time_parts, normalize};
