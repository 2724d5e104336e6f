pub mod error;

pub use error::{ClientError, Result};

use std::time::Duration;

use async_trait::async_trait;
use tracing::info;
use worldview_common::{Record, RecordSource};

/// Path of the records endpoint, relative to the configured base URL.
pub const WORLD_DETAILS_PATH: &str = "/api/world-details";

pub struct WorldDetailsClient {
    client: reqwest::Client,
    base_url: String,
}

impl WorldDetailsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, WORLD_DETAILS_PATH)
    }

    /// Fetch the full record collection. One request, no pagination, no retry.
    pub async fn fetch_records(&self) -> Result<Vec<Record>> {
        let url = self.endpoint();
        info!(url = %url, "Fetching world details");

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = resp.bytes().await?;
        let records: Vec<Record> = serde_json::from_slice(&body)?;
        info!(count = records.len(), "Fetched world details");

        Ok(records)
    }
}

#[async_trait]
impl RecordSource for WorldDetailsClient {
    async fn fetch_records(&self) -> anyhow::Result<Vec<Record>> {
        Ok(WorldDetailsClient::fetch_records(self).await?)
    }
}
