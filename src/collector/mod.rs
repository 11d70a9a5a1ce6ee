//! One collection cycle across every configured node.
//!
//! Each node gets two tasks: one for the payout estimate and one for the node
//! status, which in turn spawns a task per satellite. All tasks share a single
//! deadline; every dashboard request is bounded by it, so joining the task
//! sets is enough to know that nothing from this cycle is still running.

mod node;
mod payout;

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::metrics::MetricDesc;
use crate::node::{FetchError, NodeApi, NodeClient, Operation};
use crate::sink::{MetricSink, Snapshot};
use crate::types::Observation;

/// Summary of a finished cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub nodes: usize,
    pub failed_fetches: usize,
    pub timed_out: bool,
    pub elapsed: Duration,
}

/// Polls node dashboards and turns their state into observations
pub struct Exporter {
    nodes: Vec<(String, Arc<dyn NodeApi>)>,
    timeout: Duration,
}

impl Exporter {
    pub fn new(nodes: Vec<(String, Arc<dyn NodeApi>)>, timeout: Duration) -> Self {
        Self { nodes, timeout }
    }

    /// Build HTTP clients for every configured node, sharing one connection pool
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("storj-exporter/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let nodes = config
            .nodes
            .iter()
            .map(|n| {
                let client: Arc<dyn NodeApi> =
                    Arc::new(NodeClient::with_client(&n.base_url, http.clone()));
                (n.name.clone(), client)
            })
            .collect::<Vec<_>>();

        info!(count = nodes.len(), "Initialized node clients");
        Ok(Self::new(nodes, config.exporter.collect_timeout()))
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|(name, _)| name.as_str())
    }

    /// Run one cycle, streaming observations into `sink`.
    ///
    /// Returns once every node, payout and satellite task has finished.
    /// Failures are logged and counted, never propagated.
    pub async fn collect(&self, sink: Arc<dyn MetricSink>) -> CycleReport {
        let started = Instant::now();
        let cycle = Arc::new(Cycle::new(sink, started + self.timeout));

        debug!(nodes = self.nodes.len(), timeout = ?self.timeout, "Collection cycle started");

        let mut tasks = JoinSet::new();
        for (name, api) in &self.nodes {
            tasks.spawn(payout::collect(cycle.clone(), name.clone(), api.clone()));
            tasks.spawn(node::collect(cycle.clone(), name.clone(), api.clone()));
        }
        cycle.join(&mut tasks).await;

        let report = CycleReport {
            nodes: self.nodes.len(),
            failed_fetches: cycle.failed.load(Ordering::Relaxed),
            timed_out: cycle.timed_out.load(Ordering::Relaxed),
            elapsed: started.elapsed(),
        };

        if report.timed_out {
            warn!(
                timeout = ?self.timeout,
                failed = report.failed_fetches,
                "Collection cycle hit its deadline"
            );
        }
        debug!(
            failed = report.failed_fetches,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "Collection cycle finished"
        );

        report
    }

    /// Run one cycle into a fresh snapshot
    pub async fn scrape(&self) -> (Vec<Observation>, CycleReport) {
        let snapshot = Arc::new(Snapshot::new());
        let report = self.collect(snapshot.clone()).await;
        (snapshot.drain(), report)
    }
}

/// State shared by every task of one cycle
struct Cycle {
    sink: Arc<dyn MetricSink>,
    deadline: Instant,
    failed: AtomicUsize,
    timed_out: AtomicBool,
}

impl Cycle {
    fn new(sink: Arc<dyn MetricSink>, deadline: Instant) -> Self {
        Self {
            sink,
            deadline,
            failed: AtomicUsize::new(0),
            timed_out: AtomicBool::new(false),
        }
    }

    fn emit(&self, desc: &'static MetricDesc, labels: &[&str], value: f64) {
        if let Some(obs) = Observation::new(desc, labels, value) {
            self.sink.observe(obs);
        }
    }

    /// Await a dashboard call under the cycle deadline.
    ///
    /// Returns `None` after logging when the call fails or the deadline passes;
    /// in the latter case the request future is dropped, aborting it.
    async fn fetch<T>(
        &self,
        node: &str,
        satellite: Option<&str>,
        operation: Operation,
        call: impl Future<Output = Result<T, FetchError>>,
    ) -> Option<T> {
        match tokio::time::timeout_at(self.deadline, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!(node, satellite, operation = %operation, error = %e, "Failed to scrape node");
                self.failed.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(_) => {
                warn!(
                    node,
                    satellite,
                    operation = %operation,
                    "Request cancelled by collection deadline"
                );
                self.failed.fetch_add(1, Ordering::Relaxed);
                self.timed_out.store(true, Ordering::Relaxed);
                None
            }
        }
    }

    /// Wait for every task in `tasks`
    async fn join(&self, tasks: &mut JoinSet<()>) {
        while let Some(res) = tasks.join_next().await {
            if let Err(e) = res {
                error!(error = %e, "Collection task failed");
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}
