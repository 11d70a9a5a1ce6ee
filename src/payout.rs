//! Currency conversion for payout estimates.

use crate::node::model::{MonthPayout, PayoutEstimate};

/// Convert cents to dollars
pub fn cents_to_dollars(cents: f64) -> f64 {
    cents / 100.0
}

/// Convert every figure of a payout estimate from cents to dollars
pub fn to_dollars(estimate: &PayoutEstimate) -> PayoutEstimate {
    let month = &estimate.current_month;
    PayoutEstimate {
        current_month: MonthPayout {
            payout: cents_to_dollars(month.payout),
            disk_space_payout: cents_to_dollars(month.disk_space_payout),
            egress_bandwidth_payout: cents_to_dollars(month.egress_bandwidth_payout),
            egress_repair_audit_payout: cents_to_dollars(month.egress_repair_audit_payout),
            held: cents_to_dollars(month.held),
        },
        current_month_expectations: cents_to_dollars(estimate.current_month_expectations),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_all_six_figures() {
        let raw = PayoutEstimate {
            current_month: MonthPayout {
                payout: 25633.0,
                disk_space_payout: 20648.0,
                egress_bandwidth_payout: 4000.0,
                egress_repair_audit_payout: 985.0,
                held: 0.0,
            },
            current_month_expectations: 50500.0,
        };

        let dollars = to_dollars(&raw);
        assert_eq!(dollars.current_month.payout, 256.33);
        assert_eq!(dollars.current_month.disk_space_payout, 206.48);
        assert_eq!(dollars.current_month.egress_bandwidth_payout, 40.0);
        assert_eq!(dollars.current_month.egress_repair_audit_payout, 9.85);
        assert_eq!(dollars.current_month.held, 0.0);
        assert_eq!(dollars.current_month_expectations, 505.0);
    }

    #[test]
    fn fractional_cents_survive() {
        assert_eq!(cents_to_dollars(1.5), 0.015);
    }
}
