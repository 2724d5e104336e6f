//! Facet Resolver.
//!
//! For each dimension, works out which values its selector may offer given
//! every *other* active filter. Picking any offered value is guaranteed to
//! leave at least one record visible.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::dimension::Dimension;
use crate::filter::FilterState;
use crate::record::Record;

/// The selector contents for one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetOptions {
    pub dimension: Dimension,
    pub label: String,
    pub selected: Option<String>,
    pub options: Vec<String>,
}

/// Distinct values of `dimension` across all records, ascending.
///
/// A missing field counts as `""`. The empty value is kept here; it is
/// dropped from the offered options because selecting it means "clear".
pub fn candidates(records: &[Record], dimension: Dimension) -> Vec<String> {
    records
        .iter()
        .map(|r| dimension.value_of(r).unwrap_or(""))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Selectable values for `dimension`, ignoring the dimension's own
/// current selection.
pub fn options_for(records: &[Record], filters: &FilterState, dimension: Dimension) -> Vec<String> {
    let others = filters.without(dimension);

    candidates(records, dimension)
        .into_iter()
        .filter(|value| !value.is_empty())
        .filter(|value| {
            records
                .iter()
                .any(|r| dimension.value_of(r) == Some(value.as_str()) && others.matches(r))
        })
        .collect()
}

/// Facet options for every dimension, in display order.
pub fn resolve_all(records: &[Record], filters: &FilterState) -> Vec<FacetOptions> {
    Dimension::ALL
        .into_iter()
        .map(|dimension| FacetOptions {
            dimension,
            label: dimension.label(),
            selected: filters.get(dimension).map(str::to_string),
            options: options_for(records, filters, dimension),
        })
        .collect()
}
