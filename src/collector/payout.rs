use std::sync::Arc;

use super::Cycle;
use crate::metrics;
use crate::node::{NodeApi, Operation};
use crate::payout::to_dollars;

/// Current month payout estimate, converted to dollars.
///
/// A failed fetch emits nothing for this node; there is no zero placeholder.
pub(super) async fn collect(cycle: Arc<Cycle>, name: String, api: Arc<dyn NodeApi>) {
    let call = api.fetch_payout_estimate();
    let Some(raw) = cycle.fetch(&name, None, Operation::Payout, call).await else {
        return;
    };

    let est = to_dollars(&raw);
    let month = &est.current_month;
    let node = name.as_str();

    cycle.emit(&metrics::PAYOUT, &[node, "total"], month.payout);
    cycle.emit(&metrics::PAYOUT, &[node, "disk_space"], month.disk_space_payout);
    cycle.emit(&metrics::PAYOUT, &[node, "egress_bandwidth"], month.egress_bandwidth_payout);
    let audit = month.egress_repair_audit_payout;
    cycle.emit(&metrics::PAYOUT, &[node, "egress_audit_bandwidth"], audit);
    cycle.emit(&metrics::PAYOUT, &[node, "held"], month.held);
    cycle.emit(&metrics::PAYOUT, &[node, "total_expected"], est.current_month_expectations);
}
