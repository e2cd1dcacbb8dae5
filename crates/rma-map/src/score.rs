//! Near-miss suggestions for fields that do not resolve.
//!
//! Resolution itself is strict substring containment. When it fails, the
//! closest header by Jaro-Winkler similarity is offered as a hint so a user
//! can add it as an extra candidate in configuration.

use std::cmp::Ordering;

use rapidfuzz::distance::jaro_winkler;
use rma_model::SemanticField;

use crate::fold::fold_text;
use crate::resolver::ColumnResolver;

/// Minimum similarity for a header to be worth suggesting.
const SUGGESTION_MIN_SIMILARITY: f64 = 0.75;

/// A header that nearly matches a field's candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosestHeader {
    pub header: String,
    pub candidate: String,
    pub similarity: f64,
}

/// Finds the header most similar to any candidate of `field`.
///
/// Returns `None` when no header reaches the suggestion threshold.
pub fn closest_header<S: AsRef<str>>(
    resolver: &ColumnResolver,
    headers: &[S],
    field: SemanticField,
) -> Option<ClosestHeader> {
    let candidates = resolver.candidates(field);
    let mut best: Option<ClosestHeader> = None;
    for header in headers {
        let folded = fold_text(header.as_ref());
        if folded.is_empty() {
            continue;
        }
        for candidate in &candidates {
            let similarity = jaro_winkler::similarity(folded.chars(), candidate.chars());
            let better = best.as_ref().is_none_or(|current| {
                similarity.partial_cmp(&current.similarity) == Some(Ordering::Greater)
            });
            if better {
                best = Some(ClosestHeader {
                    header: header.as_ref().to_string(),
                    candidate: candidate.clone(),
                    similarity,
                });
            }
        }
    }
    best.filter(|b| b.similarity >= SUGGESTION_MIN_SIMILARITY)
}
