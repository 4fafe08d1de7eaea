//! Snapshot fetching from the NATS monitoring endpoints.
//!
//! One bounded-time HTTP GET per endpoint, no retries of its own:
//! retry policy is the scheduler's per-cycle isolation, not this
//! call's.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::CollectorError;
use crate::index::Category;

/// Default request timeout for monitoring fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of raw monitoring snapshots, one per category.
///
/// Abstracted so the scheduler can be exercised without a live broker.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the raw payload for one category's endpoint.
    async fn fetch(&self, category: Category) -> Result<Vec<u8>, CollectorError>;
}

/// HTTP client for a NATS monitoring address.
#[derive(Debug, Clone)]
pub struct MonitoringClient {
    client: Client,
    base: String,
}

impl MonitoringClient {
    /// Create a client for `host:port` with the default timeout.
    pub fn new(nats_addr: &str) -> Result<Self, CollectorError> {
        Self::with_timeout(nats_addr, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(nats_addr: &str, timeout: Duration) -> Result<Self, CollectorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CollectorError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            base: format!("http://{}", nats_addr),
        })
    }

    fn url(&self, category: Category) -> String {
        format!("{}{}", self.base, category.path())
    }
}

#[async_trait]
impl SnapshotSource for MonitoringClient {
    async fn fetch(&self, category: Category) -> Result<Vec<u8>, CollectorError> {
        let url = self.url(category);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(CollectorError::Fetch(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
