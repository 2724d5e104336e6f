//! Filter State and the Filter Engine.
//!
//! A [`FilterState`] holds at most one selected value per [`Dimension`].
//! An empty value is never stored: setting `""` clears the dimension, so
//! "absent" and "empty" mean the same thing (no constraint).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::error::Result;
use crate::record::Record;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    selected: BTreeMap<Dimension, String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from wire pairs such as query parameters.
    ///
    /// Unknown keys are rejected. Empty values impose no constraint.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut state = Self::new();
        for (key, value) in pairs {
            let dimension = key.as_ref().parse::<Dimension>()?;
            state.set(dimension, value);
        }
        Ok(state)
    }

    /// Select `value` on `dimension`, replacing any previous selection.
    /// An empty value clears the dimension instead.
    pub fn set(&mut self, dimension: Dimension, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.selected.remove(&dimension);
        } else {
            self.selected.insert(dimension, value);
        }
    }

    pub fn clear(&mut self, dimension: Dimension) {
        self.selected.remove(&dimension);
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    pub fn get(&self, dimension: Dimension) -> Option<&str> {
        self.selected.get(&dimension).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Active constraints in dimension order.
    pub fn active(&self) -> impl Iterator<Item = (Dimension, &str)> {
        self.selected.iter().map(|(d, v)| (*d, v.as_str()))
    }

    /// A copy of this state with `dimension` removed (leave-one-out).
    pub fn without(&self, dimension: Dimension) -> Self {
        let mut other = self.clone();
        other.clear(dimension);
        other
    }

    /// Exact, case-sensitive equality on every active dimension. A record
    /// missing a field never matches a constraint on it.
    pub fn matches(&self, record: &Record) -> bool {
        self.active()
            .all(|(dimension, value)| dimension.value_of(record) == Some(value))
    }
}

/// Retain the records that satisfy every active filter, in input order.
pub fn apply<'r>(records: &'r [Record], filters: &FilterState) -> Vec<&'r Record> {
    records.iter().filter(|r| filters.matches(r)).collect()
}
