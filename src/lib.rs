pub mod collector;
pub mod config;
pub mod exposition;
pub mod metrics;
pub mod node;
pub mod payout;
pub mod server;
pub mod sink;

pub use collector::{CycleReport, Exporter};
pub use sink::{MetricSink, Snapshot};

/// Common types used across modules
pub mod types {
    use smallvec::SmallVec;

    use crate::metrics::MetricDesc;

    /// How a sample is exposed to the scraper
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum ValueKind {
        Counter,
        Gauge,
    }

    impl std::fmt::Display for ValueKind {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                ValueKind::Counter => write!(f, "counter"),
                ValueKind::Gauge => write!(f, "gauge"),
            }
        }
    }

    /// A label key-value pair
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct Label {
        pub key: &'static str,
        pub value: String,
    }

    pub type Labels = SmallVec<[Label; 3]>;

    /// A single metric measurement produced by one collection cycle
    #[derive(Debug, Clone, PartialEq)]
    pub struct Observation {
        pub desc: &'static MetricDesc,
        pub labels: Labels,
        pub value: f64,
    }

    impl Observation {
        /// Pair `values` with the descriptor's label schema, in order.
        ///
        /// Returns `None` when the number of values does not match the schema.
        pub fn new(desc: &'static MetricDesc, values: &[&str], value: f64) -> Option<Self> {
            debug_assert_eq!(
                values.len(),
                desc.labels.len(),
                "label schema mismatch for {}",
                desc.name
            );
            if values.len() != desc.labels.len() {
                tracing::error!(
                    metric = desc.name,
                    expected = desc.labels.len(),
                    got = values.len(),
                    "label schema mismatch, observation dropped"
                );
                return None;
            }

            let labels = desc
                .labels
                .iter()
                .zip(values)
                .map(|(key, value)| Label { key: *key, value: (*value).to_string() })
                .collect();

            Some(Self { desc, labels, value })
        }

        pub fn name(&self) -> &'static str {
            self.desc.name
        }

        /// Value of the label named `key`, if present
        pub fn label(&self, key: &str) -> Option<&str> {
            self.labels.iter().find(|l| l.key == key).map(|l| l.value.as_str())
        }
    }
}
