use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinSet;
use tracing::warn;

use super::Cycle;
use crate::metrics;
use crate::node::model::SatelliteRef;
use crate::node::{NodeApi, Operation};

/// Disk usage, uptime, then one task per satellite the node reports
pub(super) async fn collect(cycle: Arc<Cycle>, name: String, api: Arc<dyn NodeApi>) {
    let Some(status) = cycle.fetch(&name, None, Operation::Status, api.fetch_status()).await else {
        return;
    };

    let node = name.as_str();
    let disk = &status.disk_space;
    cycle.emit(&metrics::DISK_SPACE, &[node, "available"], disk.available);
    cycle.emit(&metrics::DISK_SPACE, &[node, "used"], disk.used);
    cycle.emit(&metrics::DISK_SPACE, &[node, "trash"], disk.trash);
    cycle.emit(&metrics::DISK_SPACE, &[node, "overused"], disk.overused);

    let uptime = match uptime_seconds(&status.started_at, Utc::now()) {
        Ok(secs) => secs,
        Err(e) => {
            warn!(
                node = %name,
                started_at = %status.started_at,
                error = %e,
                "Failed to parse startedAt"
            );
            return;
        }
    };
    cycle.emit(&metrics::UPTIME, &[node], uptime);

    let mut satellites = JoinSet::new();
    for sat in status.satellites {
        satellites.spawn(collect_satellite(cycle.clone(), name.clone(), api.clone(), sat));
    }
    cycle.join(&mut satellites).await;
}

async fn collect_satellite(
    cycle: Arc<Cycle>,
    name: String,
    api: Arc<dyn NodeApi>,
    sat: SatelliteRef,
) {
    let call = api.fetch_satellite(&sat.id);
    let satellite = Some(sat.id.as_str());
    let Some(res) = cycle.fetch(&name, satellite, Operation::Satellite, call).await else {
        return;
    };

    let node = name.as_str();
    let url = sat.url.as_str();
    cycle.emit(&metrics::BANDWIDTH, &[node, url, "ingress"], res.ingress_summary);
    cycle.emit(&metrics::BANDWIDTH, &[node, url, "egress"], res.egress_summary);

    let audits = &res.audits;
    cycle.emit(&metrics::AUDIT_SCORE, &[node, url, "audit"], audits.audit_score);
    cycle.emit(&metrics::AUDIT_SCORE, &[node, url, "online"], audits.online_score);
    cycle.emit(&metrics::AUDIT_SCORE, &[node, url, "suspension"], audits.suspension_score);
}

/// Seconds between an RFC 3339 start time and `now`
pub(crate) fn uptime_seconds(
    started_at: &str,
    now: DateTime<Utc>,
) -> Result<f64, chrono::ParseError> {
    let started = DateTime::parse_from_rfc3339(started_at)?.with_timezone(&Utc);
    let elapsed = now - started;
    Ok(elapsed.num_milliseconds() as f64 / 1000.0)
}
