//! Record enrichment and fan-out.
//!
//! The enricher turns one correlated cycle into the flat list of
//! documents to write: one `varz`, one `subsz`, and one `routez` per
//! route. Every document gets the collector's `hostname` and a
//! `gnatsd-<port>` label identifying which broker process on a shared
//! host produced the data.

use serde_json::{Map, Value};

use crate::correlate::CorrelatedCycle;
use crate::index::Category;

/// A fully enriched document, tagged with its destination category.
#[derive(Debug, Clone)]
pub struct OutputRecord {
    pub category: Category,
    pub doc: Map<String, Value>,
}

/// Broker instance label for an anchor port, e.g. `gnatsd-4222`.
pub fn instance_label(port: u16) -> String {
    format!("gnatsd-{}", port)
}

/// Attaches collector-local metadata to correlated records.
#[derive(Debug, Clone)]
pub struct Enricher {
    hostname: String,
}

impl Enricher {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
        }
    }

    /// Build an enricher using the local machine's hostname.
    pub fn from_local_host() -> Self {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());
        Self::new(hostname)
    }

    /// Expand a correlated cycle into output records, in write order:
    /// `varz`, `subsz`, then one record per route.
    ///
    /// Never fails: correlation already validated every record.
    pub fn enrich_cycle(&self, cycle: CorrelatedCycle) -> Vec<OutputRecord> {
        let label = instance_label(cycle.port);

        let mut records = Vec::with_capacity(2 + cycle.routes.len());
        records.push(OutputRecord {
            category: Category::Varz,
            doc: self.enrich(cycle.varz, &label),
        });
        records.push(OutputRecord {
            category: Category::Subsz,
            doc: self.enrich(cycle.subsz, &label),
        });
        records.extend(cycle.routes.into_iter().map(|route| OutputRecord {
            category: Category::Routez,
            doc: self.enrich(route, &label),
        }));

        records
    }

    fn enrich(&self, mut doc: Map<String, Value>, label: &str) -> Map<String, Value> {
        doc.insert("hostname".to_string(), Value::from(self.hostname.as_str()));
        doc.insert("gnatsd".to_string(), Value::from(label));
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlate::correlate;
    use serde_json::json;

    const VARZ: &str = r#"{"port":4222,"now":"2024-01-01T00:00:00Z"}"#;

    fn cycle_with_routes(routez: &str) -> CorrelatedCycle {
        correlate(VARZ.as_bytes(), b"{}", routez.as_bytes()).unwrap()
    }

    #[test]
    fn test_instance_label() {
        assert_eq!(instance_label(4222), "gnatsd-4222");
    }

    #[test]
    fn test_every_record_gets_hostname_and_label() {
        let enricher = Enricher::new("collector-01");
        let records = enricher.enrich_cycle(cycle_with_routes(r#"{"routes":[{"port":5000}]}"#));

        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(record.doc["hostname"], json!("collector-01"));
            assert_eq!(record.doc["gnatsd"], json!("gnatsd-4222"));
        }
    }

    #[test]
    fn test_fan_out_one_record_per_route() {
        let enricher = Enricher::new("host");
        let routez = r#"{"routes":[{"port":5000},{"port":5001},{"port":5002}]}"#;
        let records = enricher.enrich_cycle(cycle_with_routes(routez));

        let routez_records: Vec<_> = records
            .iter()
            .filter(|r| r.category == Category::Routez)
            .collect();
        assert_eq!(routez_records.len(), 3);
    }

    #[test]
    fn test_empty_routes_yield_only_varz_and_subsz() {
        let enricher = Enricher::new("host");
        let records = enricher.enrich_cycle(cycle_with_routes(r#"{"routes":[]}"#));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, Category::Varz);
        assert_eq!(records[1].category, Category::Subsz);
    }

    #[test]
    fn test_worked_example_route_record() {
        let enricher = Enricher::new("collector-01");
        let records = enricher.enrich_cycle(cycle_with_routes(r#"{"routes":[{"port":5000}]}"#));

        let route = &records[2];
        assert_eq!(route.category, Category::Routez);
        assert_eq!(route.doc["port"], json!(4222));
        assert_eq!(route.doc["remote_port"], json!(5000));
        assert_eq!(route.doc["now"], json!("2024-01-01T00:00:00Z"));
        assert_eq!(route.doc["hostname"], json!("collector-01"));
        assert_eq!(route.doc["gnatsd"], json!("gnatsd-4222"));
    }

    #[test]
    fn test_from_local_host_never_empty() {
        let enricher = Enricher::from_local_host();
        assert!(!enricher.hostname.is_empty());
    }
}
