//! # nats2es
//!
//! A periodic collector that ships NATS server monitoring snapshots to
//! Elasticsearch.
//!
//! Every cycle it fetches the `/varz`, `/subsz` and `/routez` endpoints
//! of one broker, correlates the three payloads by stamping the `varz`
//! anchor's `port` and `now` onto the others, enriches each record with
//! the collector's hostname and a `gnatsd-<port>` instance label, and
//! writes every record into a date-partitioned index
//! (`nats<category>-<YYYY.MM.DD>`, UTC).
//!
//! ## Architecture
//!
//! ```text
//! Collector (scheduler loop)
//!    │  fetch x3          correlate            enrich          write
//!    ▼                                                           ▼
//! SnapshotSource ──▶ CorrelatedCycle ──▶ [OutputRecord] ──▶ DocumentSink
//! (MonitoringClient)                                         (EsSink)
//! ```
//!
//! - **[`collector`]**: the cycle scheduler - drives the loop, isolates
//!   failures to a single cycle, honors a cooperative stop flag
//! - **[`fetch`]**: one bounded-time HTTP GET per monitoring endpoint
//! - **[`correlate`]**: parses the three payloads and cross-stamps the
//!   anchor's identity so downstream records are join-able
//! - **[`enrich`]**: attaches collector-local metadata and fans routes
//!   out to one record each
//! - **[`index`]**: categories and date-partitioned index naming
//! - **[`sink`]**: Elasticsearch writes over a static node pool
//!
//! ## Embedding in a service host
//!
//! ```no_run
//! use nats2es::{Collector, Config};
//!
//! # tokio_test::block_on(async {
//! let config = Config::from_args("localhost:9200", "localhost:8222", "60000");
//! let handle = Collector::new(&config)?.spawn();
//!
//! // ... later, from the host's stop hook:
//! handle.stop();
//! handle.join().await;
//! # Ok::<_, nats2es::CollectorError>(())
//! # });
//! ```

pub mod collector;
pub mod config;
pub mod correlate;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod index;
pub mod sink;

// Re-export main types for convenience
pub use collector::{Collector, CollectorHandle};
pub use config::Config;
pub use correlate::{correlate, CorrelatedCycle};
pub use enrich::{Enricher, OutputRecord};
pub use error::CollectorError;
pub use fetch::{MonitoringClient, SnapshotSource};
pub use index::{index_name, index_name_now, Category};
pub use sink::{DocumentSink, EsSink};
