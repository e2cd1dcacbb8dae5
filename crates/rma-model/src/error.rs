use thiserror::Error;

/// Errors raised when parsing identifiers supplied by users or config files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown semantic field: {0}")]
    UnknownField(String),
    #[error("unknown time part: {0}")]
    UnknownTimePart(String),
    #[error("unknown report: {0}")]
    UnknownReport(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
}
