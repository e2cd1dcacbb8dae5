//! Shared utilities for RMA report crates.
//!
//! This crate provides common utilities used across the RMA workspace,
//! including Polars value conversions and numeric helpers.

pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use polars::{
    any_is_flag_set, any_to_f64, any_to_string, any_to_text, format_numeric, parse_f64,
    round_to,
};
