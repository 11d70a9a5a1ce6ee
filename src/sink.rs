use std::sync::Mutex;

use tokio::sync::mpsc::UnboundedSender;

use crate::types::Observation;

/// Destination for observations produced by a collection cycle.
///
/// Implementations are shared by every task of a cycle and must accept
/// concurrent writers.
pub trait MetricSink: Send + Sync {
    fn observe(&self, obs: Observation);
}

/// Thread-safe in-memory collector for a single cycle
#[derive(Debug, Default)]
pub struct Snapshot {
    inner: Mutex<Vec<Observation>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the gathered observations, leaving the snapshot empty
    pub fn drain(&self) -> Vec<Observation> {
        std::mem::take(&mut *self.lock())
    }

    // A panicking producer must not wedge later scrapes.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Observation>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MetricSink for Snapshot {
    fn observe(&self, obs: Observation) {
        self.lock().push(obs);
    }
}

impl MetricSink for UnboundedSender<Observation> {
    fn observe(&self, obs: Observation) {
        if self.send(obs).is_err() {
            tracing::debug!("observation receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics;
    use std::sync::Arc;

    fn uptime(node: &str, value: f64) -> Observation {
        Observation::new(&metrics::UPTIME, &[node], value).unwrap()
    }

    #[test]
    fn snapshot_collects_from_many_threads() {
        let snapshot = Arc::new(Snapshot::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let snapshot = snapshot.clone();
                std::thread::spawn(move || {
                    for j in 0..100 {
                        snapshot.observe(uptime(&format!("n{i}"), j as f64));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(snapshot.len(), 800);
    }

    #[test]
    fn drain_empties_snapshot() {
        let snapshot = Snapshot::new();
        snapshot.observe(uptime("alpha", 1.0));

        let taken = snapshot.drain();
        assert_eq!(taken.len(), 1);
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn channel_sink_forwards() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        tx.observe(uptime("alpha", 5.0));
        drop(tx);

        let obs = rx.recv().await.unwrap();
        assert_eq!(obs.label("node"), Some("alpha"));
        assert_eq!(obs.value, 5.0);
        assert!(rx.recv().await.is_none());
    }
}
