//! Elasticsearch document sink.
//!
//! Writes one document per call to `/{index}/{category}`. A rejected
//! write is reported, never thrown: the caller logs it and moves on to
//! the remaining records. The node list acts as a static pool - writes
//! go to the active node, and a transport-level failure rotates to the
//! next node for subsequent attempts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};

use crate::error::CollectorError;

/// Default request timeout for store writes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Destination for enriched documents.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Write one document to one index under the given category label.
    async fn write(
        &self,
        index: &str,
        category: &str,
        doc: &Map<String, Value>,
    ) -> Result<(), CollectorError>;
}

/// Elasticsearch sink over a static node pool.
#[derive(Debug)]
pub struct EsSink {
    client: Client,
    nodes: Vec<String>,
    active: AtomicUsize,
}

impl EsSink {
    /// Create a sink over `host:port` nodes with the default timeout.
    pub fn new(nodes: Vec<String>) -> Result<Self, CollectorError> {
        Self::with_timeout(nodes, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(nodes: Vec<String>, timeout: Duration) -> Result<Self, CollectorError> {
        if nodes.is_empty() {
            return Err(CollectorError::Write("no store nodes configured".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CollectorError::Connection(e.to_string()))?;

        Ok(Self {
            client,
            nodes,
            active: AtomicUsize::new(0),
        })
    }

    fn active_node(&self) -> &str {
        &self.nodes[self.active.load(Ordering::Relaxed) % self.nodes.len()]
    }

    fn rotate(&self) {
        self.active.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl DocumentSink for EsSink {
    async fn write(
        &self,
        index: &str,
        category: &str,
        doc: &Map<String, Value>,
    ) -> Result<(), CollectorError> {
        let url = format!("http://{}/{}/{}", self.active_node(), index, category);

        let response = match self.client.post(&url).json(doc).send().await {
            Ok(response) => response,
            Err(e) => {
                self.rotate();
                return Err(CollectorError::Write(e.to_string()));
            }
        };

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(CollectorError::Write(server_error(status, &body)))
    }
}

/// Pull the server-supplied error message out of a rejection body,
/// falling back to the raw body or the bare status.
fn server_error(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(error) = value.get("error") {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return format!("{}: {}", status, message);
        }
    }
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_empty_node_list_is_rejected() {
        let err = EsSink::new(Vec::new()).unwrap_err();
        assert!(matches!(err, CollectorError::Write(_)));
    }

    #[test]
    fn test_rotate_wraps_around_the_pool() {
        let sink = EsSink::new(vec!["es1:9200".to_string(), "es2:9200".to_string()]).unwrap();
        assert_eq!(sink.active_node(), "es1:9200");
        sink.rotate();
        assert_eq!(sink.active_node(), "es2:9200");
        sink.rotate();
        assert_eq!(sink.active_node(), "es1:9200");
    }

    #[test]
    fn test_server_error_extracts_error_field() {
        let body = r#"{"error":"mapper_parsing_exception","status":400}"#;
        let message = server_error(StatusCode::BAD_REQUEST, body);
        assert!(message.contains("mapper_parsing_exception"));
        assert!(message.contains("400"));
    }

    #[test]
    fn test_server_error_handles_structured_error() {
        let body = r#"{"error":{"type":"index_not_found_exception"}}"#;
        let message = server_error(StatusCode::NOT_FOUND, body);
        assert!(message.contains("index_not_found_exception"));
    }

    #[test]
    fn test_server_error_falls_back_to_body_or_status() {
        assert!(server_error(StatusCode::BAD_GATEWAY, "upstream down").contains("upstream down"));
        assert_eq!(
            server_error(StatusCode::BAD_GATEWAY, ""),
            StatusCode::BAD_GATEWAY.to_string()
        );
    }

    #[tokio::test]
    async fn test_unreachable_node_is_write_error_and_rotates() {
        let sink = EsSink::with_timeout(
            vec!["127.0.0.1:9".to_string(), "127.0.0.1:10".to_string()],
            Duration::from_millis(200),
        )
        .unwrap();

        let doc = Map::new();
        let err = sink.write("natsvarz-2024.01.01", "varz", &doc).await.unwrap_err();
        assert!(matches!(err, CollectorError::Write(_)));
        assert_eq!(sink.active_node(), "127.0.0.1:10");
    }
}
