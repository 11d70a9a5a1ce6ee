//! HTTP surface of the exporter.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Info page linking to the metrics path |
//! | GET | metrics path (default `/metrics`) | Runs one collection cycle |
//! | GET | `/healthz` | Exporter liveness |

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use crate::collector::Exporter;
use crate::exposition;

#[derive(Clone)]
struct AppState {
    exporter: Arc<Exporter>,
    index: Arc<str>,
}

/// Build the exporter router
pub fn build_router(exporter: Arc<Exporter>, metrics_path: &str) -> Router {
    let state = AppState {
        exporter,
        index: index_page(metrics_path).into(),
    };

    Router::new()
        .route("/", get(index))
        .route(metrics_path, get(scrape))
        .route("/healthz", get(healthz))
        .with_state(state)
}

fn index_page(metrics_path: &str) -> String {
    format!(
        "<html>
<head><title>Storj Node Exporter</title></head>
<body>
<h1>Storj Node Exporter</h1>
<p><a href=\"{metrics_path}\">Metrics</a></p>
</body>
</html>
"
    )
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.index.to_string())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn scrape(State(state): State<AppState>) -> impl IntoResponse {
    let (observations, report) = state.exporter.scrape().await;
    tracing::debug!(
        observations = observations.len(),
        failed = report.failed_fetches,
        "Scrape served"
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, exposition::CONTENT_TYPE)],
        exposition::render(&observations),
    )
}
