use serde::Deserialize;

/// Response of `GET /api/sno/`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeStatus {
    #[serde(rename = "startedAT")]
    pub started_at: String,
    #[serde(rename = "lastPinged")]
    pub last_pinged: Option<String>,
    pub version: Option<String>,
    #[serde(rename = "diskSpace")]
    pub disk_space: DiskSpace,
    pub satellites: Vec<SatelliteRef>,
}

/// Disk usage breakdown in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiskSpace {
    pub available: f64,
    pub used: f64,
    pub trash: f64,
    pub overused: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SatelliteRef {
    pub id: String,
    pub url: String,
}

/// Response of `GET /api/sno/satellite/{id}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SatelliteStatus {
    pub egress_summary: f64,
    pub ingress_summary: f64,
    pub storage_summary: f64,
    pub audits: AuditScores,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditScores {
    pub audit_score: f64,
    pub online_score: f64,
    pub suspension_score: f64,
}

/// Response of `GET /api/sno/estimated-payout`.
///
/// The node reports every figure in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PayoutEstimate {
    pub current_month: MonthPayout,
    pub current_month_expectations: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MonthPayout {
    pub payout: f64,
    pub disk_space_payout: f64,
    pub egress_bandwidth_payout: f64,
    pub egress_repair_audit_payout: f64,
    pub held: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_node_status() {
        let body = r#"{
            "startedAT": "2024-01-01T00:00:00Z",
            "lastPinged": "2024-01-02T00:00:00Z",
            "version": "1.95.1",
            "diskSpace": {"available": 10, "used": 5, "trash": 1, "overused": 0},
            "satellites": [{"id": "s1", "url": "sat.example"}]
        }"#;

        let status: NodeStatus = serde_json::from_str(body).unwrap();
        assert_eq!(status.started_at, "2024-01-01T00:00:00Z");
        assert_eq!(status.version.as_deref(), Some("1.95.1"));
        assert_eq!(status.disk_space.available, 10.0);
        assert_eq!(status.disk_space.trash, 1.0);
        assert_eq!(
            status.satellites,
            vec![SatelliteRef { id: "s1".into(), url: "sat.example".into() }]
        );
    }

    #[test]
    fn decode_node_status_tolerates_missing_fields() {
        let status: NodeStatus = serde_json::from_str(r#"{"startedAT": "x"}"#).unwrap();
        assert!(status.satellites.is_empty());
        assert_eq!(status.disk_space, DiskSpace::default());
    }

    #[test]
    fn decode_satellite_status() {
        let body = r#"{
            "egressSummary": 100,
            "ingressSummary": 50,
            "storageSummary": 12.5,
            "audits": {"auditScore": 0.99, "onlineScore": 1.0, "suspensionScore": 1.0}
        }"#;

        let sat: SatelliteStatus = serde_json::from_str(body).unwrap();
        assert_eq!(sat.egress_summary, 100.0);
        assert_eq!(sat.ingress_summary, 50.0);
        assert_eq!(sat.audits.audit_score, 0.99);
        assert_eq!(sat.audits.suspension_score, 1.0);
    }

    #[test]
    fn decode_payout_estimate() {
        let body = r#"{
            "currentMonth": {
                "payout": 25633,
                "diskSpacePayout": 20648,
                "egressBandwidthPayout": 4000,
                "egressRepairAuditPayout": 985,
                "held": 120.5
            },
            "currentMonthExpectations": 50500
        }"#;

        let est: PayoutEstimate = serde_json::from_str(body).unwrap();
        assert_eq!(est.current_month.payout, 25633.0);
        assert_eq!(est.current_month.held, 120.5);
        assert_eq!(est.current_month_expectations, 50500.0);
    }

    #[test]
    fn wrong_shape_is_rejected() {
        assert!(serde_json::from_str::<NodeStatus>(r#"{"diskSpace": "full"}"#).is_err());
        assert!(serde_json::from_str::<SatelliteStatus>(r#""not an object""#).is_err());
    }
}
