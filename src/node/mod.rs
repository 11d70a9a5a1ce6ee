pub mod client;
pub mod model;

use async_trait::async_trait;
use thiserror::Error;

pub use client::NodeClient;
pub use model::{NodeStatus, PayoutEstimate, SatelliteStatus};

/// Read-only view of one storage node's dashboard API.
///
/// Each call issues a single request with no retries. Dropping the returned
/// future aborts the request, which is how a cycle deadline cancels work.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// `GET /api/sno/`
    async fn fetch_status(&self) -> Result<NodeStatus, FetchError>;

    /// `GET /api/sno/satellite/{id}`
    async fn fetch_satellite(&self, satellite_id: &str) -> Result<SatelliteStatus, FetchError>;

    /// `GET /api/sno/estimated-payout`, figures in cents
    async fn fetch_payout_estimate(&self) -> Result<PayoutEstimate, FetchError>;
}

/// Failure of a single dashboard request
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status code {status} from {url}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("failed to decode response from {url}: {source}, {body}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }
}

/// Dashboard call being made, for log context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Status,
    Satellite,
    Payout,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Status => write!(f, "status"),
            Operation::Satellite => write!(f, "satellite"),
            Operation::Payout => write!(f, "estimated-payout"),
        }
    }
}
