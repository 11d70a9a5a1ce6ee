//! Metric descriptors exposed by the exporter.
//!
//! Names, help strings and label schemas are fixed at compile time and shared
//! by every collection cycle.

use crate::types::ValueKind;

/// Static description of one metric family
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
    pub kind: ValueKind,
}

pub static UPTIME: MetricDesc = MetricDesc {
    name: "storj_node_uptime_seconds",
    help: "Node uptime in seconds",
    labels: &["node"],
    kind: ValueKind::Counter,
};

pub static PAYOUT: MetricDesc = MetricDesc {
    name: "storj_node_payout_dollars",
    help: "Current month payout estimate in dollars.",
    labels: &["node", "type"],
    kind: ValueKind::Counter,
};

pub static BANDWIDTH: MetricDesc = MetricDesc {
    name: "storj_bandwidth_by_type",
    help: "Total bandwidth ingress/egress in bytes.",
    labels: &["node", "satellite", "type"],
    kind: ValueKind::Counter,
};

pub static DISK_SPACE: MetricDesc = MetricDesc {
    name: "storj_disk_space",
    help: "Total space by type in bytes.",
    labels: &["node", "type"],
    kind: ValueKind::Counter,
};

pub static AUDIT_SCORE: MetricDesc = MetricDesc {
    name: "storj_audit_score",
    help: "Node audit score.",
    labels: &["node", "satellite", "type"],
    kind: ValueKind::Gauge,
};

/// Every family in exposition order
pub static ALL: [&MetricDesc; 5] = [&UPTIME, &PAYOUT, &BANDWIDTH, &DISK_SPACE, &AUDIT_SCORE];
