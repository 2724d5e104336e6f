//! The seam between the dashboard and whatever supplies its records.

use anyhow::Result;
use async_trait::async_trait;

use crate::record::Record;

/// Supplies the full record collection in one shot.
///
/// Implemented by the HTTP world-details client and by in-memory sources
/// in tests. Called once per (re)load; there is no retry at this layer.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<Record>>;
}

/// A fixed record set, handy for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<Record>,
}

impl StaticSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    async fn fetch_records(&self) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }
}
