use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::model::{NodeStatus, PayoutEstimate, SatelliteStatus};
use super::{FetchError, NodeApi};

/// Longest response body carried in an error message
const MAX_BODY_IN_ERROR: usize = 512;

/// HTTP client for a single node dashboard
#[derive(Debug, Clone)]
pub struct NodeClient {
    base_url: String,
    client: reqwest::Client,
}

impl NodeClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Share a connection pool between several nodes
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.strip_suffix('/').unwrap_or(base_url).to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.url(path);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url,
            source,
            body: truncate(&body),
        })
    }
}

#[async_trait]
impl NodeApi for NodeClient {
    async fn fetch_status(&self) -> Result<NodeStatus, FetchError> {
        self.get_json("/api/sno/").await
    }

    async fn fetch_satellite(&self, satellite_id: &str) -> Result<SatelliteStatus, FetchError> {
        self.get_json(&format!("/api/sno/satellite/{satellite_id}")).await
    }

    async fn fetch_payout_estimate(&self) -> Result<PayoutEstimate, FetchError> {
        self.get_json("/api/sno/estimated-payout").await
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_BODY_IN_ERROR {
        return body.to_string();
    }
    let mut end = MAX_BODY_IN_ERROR;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = NodeClient::new("http://node.local:14002/");
        assert_eq!(client.base_url(), "http://node.local:14002");
        assert_eq!(client.url("/api/sno/"), "http://node.local:14002/api/sno/");
    }

    #[test]
    fn only_one_trailing_slash_is_trimmed() {
        assert_eq!(NodeClient::new("http://h//").base_url(), "http://h/");
        assert_eq!(NodeClient::new("http://h").base_url(), "http://h");
    }

    #[test]
    fn short_body_kept_whole() {
        assert_eq!(truncate("not found"), "not found");
    }

    #[test]
    fn long_body_truncated_on_char_boundary() {
        let body = "é".repeat(MAX_BODY_IN_ERROR);
        let out = truncate(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= MAX_BODY_IN_ERROR + 3);
    }

    #[tokio::test]
    async fn unreachable_node_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = NodeClient::new(&format!("http://{addr}"));
        let err = client.fetch_status().await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }), "{err}");
        assert_eq!(err.url(), format!("http://{addr}/api/sno/"));
    }
}
