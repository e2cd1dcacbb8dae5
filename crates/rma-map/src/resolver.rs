//! Header resolution for semantic fields.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use rma_model::SemanticField;
use tracing::trace;

use crate::candidates::default_candidates;
use crate::fold::fold_text;

/// Resolves semantic fields to the literal headers of a dataset.
///
/// Holds the candidate table: the built-in spellings plus any extra
/// substrings supplied by configuration, which are tried after the defaults.
/// Resolution is pure; nothing is cached between calls.
#[derive(Debug, Clone, Default)]
pub struct ColumnResolver {
    extra: BTreeMap<SemanticField, Vec<String>>,
}

impl ColumnResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds extra header substrings for `field`.
    #[must_use]
    pub fn with_extra_candidates<I, S>(mut self, field: SemanticField, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra
            .entry(field)
            .or_default()
            .extend(candidates.into_iter().map(Into::into));
        self
    }

    /// Folded candidates for `field`, in priority order. Blank entries are dropped.
    pub fn candidates(&self, field: SemanticField) -> Vec<String> {
        let defaults = default_candidates(field).iter().map(|c| fold_text(c));
        let extra = self
            .extra
            .get(&field)
            .into_iter()
            .flatten()
            .map(|c| fold_text(c));
        defaults.chain(extra).filter(|c| !c.is_empty()).collect()
    }

    /// Returns the first header whose folded form contains a folded candidate.
    ///
    /// Candidates are tried in priority order; for each candidate, headers
    /// are scanned in declaration order. A header that also contains a longer
    /// candidate of another field which itself contains the candidate belongs
    /// to that field and is skipped, so "product" never lands on
    /// "Product group" and "repaired" never lands on "Not repaired".
    pub fn resolve<S: AsRef<str>>(&self, headers: &[S], field: SemanticField) -> Option<String> {
        let folded: Vec<String> = headers.iter().map(|h| fold_text(h.as_ref())).collect();
        let foreign = self.foreign_candidates(field);
        for candidate in self.candidates(field) {
            let claims: Vec<&str> = foreign
                .iter()
                .map(String::as_str)
                .filter(|other| other.len() > candidate.len() && other.contains(candidate.as_str()))
                .collect();
            let matched = folded.iter().position(|h| {
                h.contains(candidate.as_str()) && !claims.iter().any(|claim| h.contains(*claim))
            });
            if let Some(idx) = matched {
                let header = headers[idx].as_ref().to_string();
                trace!(field = %field, header = %header, "resolved column");
                return Some(header);
            }
        }
        trace!(field = %field, "column not resolved");
        None
    }

    /// Folded candidates of every field other than `field`.
    fn foreign_candidates(&self, field: SemanticField) -> Vec<String> {
        SemanticField::ALL
            .into_iter()
            .filter(|other| *other != field)
            .flat_map(|other| self.candidates(other))
            .collect()
    }

    /// Resolves `field` against the column names of `df`.
    pub fn resolve_in(&self, df: &DataFrame, field: SemanticField) -> Option<String> {
        let headers: Vec<String> = df
            .get_column_names_owned()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        self.resolve(&headers, field)
    }

    /// Resolves every semantic field, in catalog order.
    pub fn resolve_all<S: AsRef<str>>(&self, headers: &[S]) -> Vec<(SemanticField, Option<String>)> {
        SemanticField::ALL
            .into_iter()
            .map(|field| (field, self.resolve(headers, field)))
            .collect()
    }
}

/// Resolves `field` with the built-in candidate table.
///
/// # Examples
///
/// ```
/// use rma_map::resolve;
/// use rma_model::SemanticField;
///
/// let headers = ["STT", "KHÁCH HÀNG ", "Sản phẩm"];
/// assert_eq!(
///     resolve(&headers, SemanticField::Customer).as_deref(),
///     Some("KHÁCH HÀNG ")
/// );
/// assert_eq!(resolve(&headers, SemanticField::Serial), None);
/// ```
pub fn resolve<S: AsRef<str>>(headers: &[S], field: SemanticField) -> Option<String> {
    ColumnResolver::default().resolve(headers, field)
}
