//! Collector configuration.
//!
//! Configuration is assembled once at startup from command-line values
//! and stays immutable for the life of the process. Malformed values
//! never abort startup: each field falls back to its default
//! independently.

use std::time::Duration;

/// Default Elasticsearch node when none is given.
pub const DEFAULT_ELASTICSEARCH: &str = "localhost:9200";

/// Default NATS monitoring address when none is given.
pub const DEFAULT_NATS: &str = "localhost:8222";

/// Default sleep between cycles, in milliseconds.
pub const DEFAULT_SLEEP_MS: u64 = 60_000;

/// Immutable collector configuration, fixed at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Elasticsearch nodes as `host:port`, tried in order.
    pub elasticsearch: Vec<String>,
    /// NATS monitoring address as `host:port`.
    pub nats: String,
    /// Sleep between cycles.
    pub sleep: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            elasticsearch: vec![DEFAULT_ELASTICSEARCH.to_string()],
            nats: DEFAULT_NATS.to_string(),
            sleep: Duration::from_millis(DEFAULT_SLEEP_MS),
        }
    }
}

impl Config {
    /// Build a configuration from raw argument values.
    ///
    /// `elasticsearch` is a semicolon-separated `host:port` list,
    /// `sleep` is milliseconds as a string. Empty or unparsable values
    /// fall back to the defaults rather than failing.
    pub fn from_args(elasticsearch: &str, nats: &str, sleep: &str) -> Self {
        let defaults = Self::default();

        let nodes: Vec<String> = elasticsearch
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let nats = nats.trim();

        Self {
            elasticsearch: if nodes.is_empty() {
                defaults.elasticsearch
            } else {
                nodes
            },
            nats: if nats.is_empty() {
                defaults.nats
            } else {
                nats.to_string()
            },
            sleep: sleep
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .unwrap_or(defaults.sleep),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.elasticsearch, vec!["localhost:9200"]);
        assert_eq!(config.nats, "localhost:8222");
        assert_eq!(config.sleep, Duration::from_millis(60_000));
    }

    #[test]
    fn test_from_args_custom() {
        let config = Config::from_args("es1:9200;es2:9200", "broker:8222", "5000");
        assert_eq!(config.elasticsearch, vec!["es1:9200", "es2:9200"]);
        assert_eq!(config.nats, "broker:8222");
        assert_eq!(config.sleep, Duration::from_millis(5000));
    }

    #[test]
    fn test_from_args_trims_and_skips_empty_nodes() {
        let config = Config::from_args(" es1:9200 ; ;es2:9200;", "broker:8222", "1000");
        assert_eq!(config.elasticsearch, vec!["es1:9200", "es2:9200"]);
    }

    #[test]
    fn test_malformed_sleep_falls_back_to_default() {
        let config = Config::from_args("es1:9200", "broker:8222", "not-a-number");
        assert_eq!(config.sleep, Duration::from_millis(DEFAULT_SLEEP_MS));
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = Config::from_args("", "  ", "");
        assert_eq!(config.elasticsearch, vec!["localhost:9200"]);
        assert_eq!(config.nats, "localhost:8222");
        assert_eq!(config.sleep, Duration::from_millis(DEFAULT_SLEEP_MS));
    }
}
