//! Library components of the `rma` command-line tool.

pub mod config;
pub mod export;
pub mod logging;
