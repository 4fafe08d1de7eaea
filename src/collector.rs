//! The cycle scheduler.
//!
//! Drives the repeating fetch -> correlate -> enrich -> write cycle on
//! a background task. Each cycle is isolated: a failed fetch or a
//! malformed payload abandons that cycle only, a rejected write skips
//! that record only, and the loop always reaches the next sleep. Two
//! cycles never overlap - the loop sleeps the full configured interval
//! after one cycle's writes before starting the next.
//!
//! Stopping is cooperative: the stop flag is checked at the top of each
//! iteration, so an in-flight cycle completes and stop latency is
//! bounded by one cycle plus one sleep.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::correlate::correlate;
use crate::enrich::Enricher;
use crate::error::CollectorError;
use crate::fetch::{MonitoringClient, SnapshotSource};
use crate::index::{index_name_now, Category};
use crate::sink::{DocumentSink, EsSink};

/// The collection loop, bundling source, sink, and enrichment.
pub struct Collector {
    interval: Duration,
    source: Arc<dyn SnapshotSource>,
    sink: Arc<dyn DocumentSink>,
    enricher: Enricher,
}

impl Collector {
    /// Build a collector over a live broker and store, per the config.
    pub fn new(config: &Config) -> Result<Self, CollectorError> {
        let source = MonitoringClient::new(&config.nats)?;
        let sink = EsSink::new(config.elasticsearch.clone())?;

        Ok(Self::with_parts(
            config.sleep,
            Arc::new(source),
            Arc::new(sink),
            Enricher::from_local_host(),
        ))
    }

    /// Build a collector from explicit parts. Used for embedding and
    /// for exercising the loop without a live broker.
    pub fn with_parts(
        interval: Duration,
        source: Arc<dyn SnapshotSource>,
        sink: Arc<dyn DocumentSink>,
        enricher: Enricher,
    ) -> Self {
        Self {
            interval,
            source,
            sink,
            enricher,
        }
    }

    /// Spawn the collection loop on a background task.
    ///
    /// The returned handle stops the loop cooperatively; dropping it
    /// does not stop the loop.
    pub fn spawn(self) -> CollectorHandle {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = tokio::spawn(async move {
            self.run(stop_flag).await;
        });

        CollectorHandle { stop, handle }
    }

    async fn run(self, stop: Arc<AtomicBool>) {
        info!("collector started, interval {:?}", self.interval);

        loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            match self.run_cycle().await {
                Ok(written) => debug!("cycle complete, {} records written", written),
                Err(e) => warn!("cycle abandoned: {}", e),
            }

            tokio::time::sleep(self.interval).await;
        }

        info!("collector stopped");
    }

    /// One full cycle. Returns the number of records written, or the
    /// fetch/parse error that abandoned the cycle. Write failures are
    /// logged per record and do not abandon the cycle.
    async fn run_cycle(&self) -> Result<usize, CollectorError> {
        // Correlation needs all three payloads; any fetch failure
        // means no writes at all for this cycle.
        let (varz, subsz, routez) = tokio::try_join!(
            self.source.fetch(Category::Varz),
            self.source.fetch(Category::Subsz),
            self.source.fetch(Category::Routez),
        )?;

        let cycle = correlate(&varz, &subsz, &routez)?;
        let records = self.enricher.enrich_cycle(cycle);

        let mut written = 0;
        for record in &records {
            let index = index_name_now(record.category);
            match self.sink.write(&index, record.category.as_str(), &record.doc).await {
                Ok(()) => written += 1,
                Err(e) => warn!("write to {} failed: {}", index, e),
            }
        }

        Ok(written)
    }
}

/// Handle to a running collector, for embedding in a service host.
pub struct CollectorHandle {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl CollectorHandle {
    /// Request a cooperative stop. The in-flight cycle completes.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Wait for the loop to finish.
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}
