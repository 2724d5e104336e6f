//! The dashboard session: the loaded Record Store, the Filter State, and
//! everything derived from the two.
//!
//! All derived data is recomputed from scratch after each mutation and
//! handed to subscribers. Nothing derived is cached between mutations, so
//! it cannot drift from its sources.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::charts::{statistics, Charts, Statistics};
use crate::dimension::Dimension;
use crate::error::{Result, WorldviewError};
use crate::facet::{resolve_all, FacetOptions};
use crate::filter::{apply, FilterState};
use crate::record::{Record, RecordStore};

/// Shown to users whenever the initial fetch fails. Details go to the log.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data. Please try again later.";

#[derive(Debug, Clone)]
enum LoadState {
    Loading,
    Failed(String),
    Ready(RecordStore),
}

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filters: FilterState,
    pub facets: Vec<FacetOptions>,
    pub total_records: usize,
    pub record_count: usize,
    pub statistics: Statistics,
    pub charts: Charts,
}

impl DashboardView {
    pub fn compute(store: &RecordStore, filters: &FilterState) -> Self {
        let subset = apply(store, filters);
        Self {
            filters: filters.clone(),
            facets: resolve_all(store, filters),
            total_records: store.len(),
            record_count: subset.len(),
            statistics: statistics(&subset),
            charts: Charts::compute(&subset),
        }
    }
}

pub type Subscriber = Box<dyn Fn(&DashboardView) + Send + Sync>;

/// Identifies one fetch started by [`Dashboard::begin_reload`]. Only the
/// most recently issued ticket may resolve the load state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct Dashboard {
    state: LoadState,
    generation: u64,
    filters: FilterState,
    subscribers: Vec<Subscriber>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("filters", &self.filters)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
            generation: 0,
            filters: FilterState::new(),
            subscribers: Vec::new(),
        }
    }

    /// Register an observer called with the fresh view after every
    /// successful mutation.
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: Fn(&DashboardView) + Send + Sync + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready(_))
    }

    /// Mark a fetch as in flight. The current filters survive until the
    /// fetch resolves.
    ///
    /// Issuing a ticket supersedes every earlier one, so a slow fetch that
    /// finishes after a newer one cannot overwrite its result.
    pub fn begin_reload(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.generation)
    }

    /// Replace the Record Store wholesale and start a fresh filter session.
    ///
    /// Returns `false` and leaves the session untouched if `ticket` has been
    /// superseded.
    pub fn load(&mut self, ticket: LoadTicket, records: Vec<Record>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        info!(count = records.len(), "Record store loaded");
        let store = RecordStore::new(records);
        self.filters.clear_all();
        let view = DashboardView::compute(&store, &self.filters);
        self.state = LoadState::Ready(store);
        self.notify(&view);
        true
    }

    pub fn fail(&mut self, ticket: LoadTicket, reason: impl fmt::Display) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let reason = reason.to_string();
        warn!(error = %reason, "Record store failed to load");
        self.state = LoadState::Failed(reason);
        true
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        if ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                current = self.generation,
                "Ignoring superseded fetch"
            );
            return false;
        }
        true
    }

    /// The single filter mutation entry point. An empty value clears the
    /// dimension.
    pub fn set_filter(
        &mut self,
        dimension: Dimension,
        value: impl Into<String>,
    ) -> Result<DashboardView> {
        self.store()?;
        let value = value.into();
        debug!(dimension = %dimension, value = %value, "Filter changed");
        self.filters.set(dimension, value);
        self.publish()
    }

    pub fn clear_filter(&mut self, dimension: Dimension) -> Result<DashboardView> {
        self.set_filter(dimension, "")
    }

    pub fn clear_filters(&mut self) -> Result<DashboardView> {
        self.store()?;
        debug!("All filters cleared");
        self.filters.clear_all();
        self.publish()
    }

    pub fn store(&self) -> Result<&RecordStore> {
        match &self.state {
            LoadState::Ready(store) => Ok(store),
            LoadState::Loading => Err(WorldviewError::Loading),
            LoadState::Failed(reason) => Err(WorldviewError::LoadFailed(reason.clone())),
        }
    }

    pub fn filtered_records(&self) -> Result<Vec<&Record>> {
        Ok(apply(self.store()?, &self.filters))
    }

    pub fn facets(&self) -> Result<Vec<FacetOptions>> {
        Ok(resolve_all(self.store()?, &self.filters))
    }

    pub fn view(&self) -> Result<DashboardView> {
        Ok(DashboardView::compute(self.store()?, &self.filters))
    }

    fn publish(&self) -> Result<DashboardView> {
        let view = self.view()?;
        self.notify(&view);
        Ok(view)
    }

    fn notify(&self, view: &DashboardView) {
        debug!(
            records = view.record_count,
            subscribers = self.subscribers.len(),
            "Dashboard recomputed"
        );
        for subscriber in &self.subscribers {
            subscriber(view);
        }
    }
}
