//! RMA report catalog.
//!
//! Reports are thin configurations of the generic operations in [`ops`].
//! [`ReportCatalog`] resolves the columns a report needs, checks
//! the caller's role and parameters, and returns a tagged
//! [`ReportResult`](rma_model::ReportResult).

#![deny(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod ops;
pub mod templates;

pub use catalog::ReportCatalog;
pub use error::{ReportError, Result};
pub use templates::{Param, TemplateInfo, template};
