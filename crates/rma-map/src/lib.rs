//! Semantic column resolution.
//!
//! Exports spell the same column many ways ("Khách Hàng", "khach hang",
//! "TÊN KHÁCH HÀNG "). This crate folds header text to a canonical token form
//! and finds the header playing a given [`SemanticField`] role.
//!
//! [`SemanticField`]: rma_model::SemanticField

#![deny(unsafe_code)]

pub mod candidates;
pub mod fold;
pub mod resolver;
pub mod score;

pub use candidates::default_candidates;
pub use fold::fold_text;
pub use resolver::{ColumnResolver, resolve};
pub use score::{ClosestHeader, closest_header};
