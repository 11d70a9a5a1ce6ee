use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{error, info};

use storj_exporter::config::Config;
use storj_exporter::{server, Exporter};

const ENV_HELP: &str = "\
Environment:
  STORJ_EXPORTER_CONFIG                Path to configuration file
  STORJ_EXPORTER_NODES                 Nodes as name=url,name=url (replaces [[nodes]])
  STORJ_EXPORTER_LISTEN                Listen address [default: 0.0.0.0:9100]
  STORJ_EXPORTER_METRICS_PATH          Scrape path [default: /metrics]
  STORJ_EXPORTER_COLLECT_TIMEOUT_SECS  Deadline for one collection cycle [default: 30]
  STORJ_EXPORTER_LOG_LEVEL             Log filter when RUST_LOG is unset [default: info]";

#[derive(Parser, Debug)]
#[command(
    name = "storj-exporter",
    about = "Prometheus exporter for Storj storage nodes",
    after_help = ENV_HELP
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "STORJ_EXPORTER_CONFIG")]
    config: Option<String>,

    /// Validate config and exit
    #[arg(long)]
    check: bool,

    /// Print version and exit
    #[arg(short = 'V', long)]
    version: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("storj-exporter {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load config: {:#}\n", e);
            eprintln!("{}", Cli::command().render_help());
            std::process::exit(2);
        }
    };

    if cli.check {
        println!("Configuration is valid.");
        for node in &config.nodes {
            println!("  {} -> {}", node.name, node.base_url);
        }
        return Ok(());
    }

    // Initialize logging
    init_logging(&config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        nodes = config.nodes.len(),
        "Starting Storj node exporter"
    );

    if let Err(e) = run(config).await {
        error!(error = %e, "Exporter terminated with error");
        return Err(e);
    }

    Ok(())
}

fn init_logging(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.exporter.log_level))
        .with_context(|| format!("Invalid log level: {}", config.exporter.log_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    Ok(())
}

async fn run(config: Config) -> Result<()> {
    let exporter = Arc::new(Exporter::from_config(&config)?);
    info!(nodes = ?exporter.node_names().collect::<Vec<_>>(), "Polling nodes");
    let app = server::build_router(exporter, &config.exporter.metrics_path);

    let listener = tokio::net::TcpListener::bind(&config.exporter.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.exporter.listen))?;

    info!(
        listen_addr = %config.exporter.listen,
        metrics_path = %config.exporter.metrics_path,
        timeout_secs = config.exporter.collect_timeout_secs,
        "Exporter listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Exporter shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn capital_v_prints_version() {
        let cli = Cli::try_parse_from(["storj-exporter", "-V"]).unwrap();
        assert!(cli.version);
        assert!(Cli::try_parse_from(["storj-exporter", "-v"]).is_err());
    }

    #[test]
    fn env_help_lists_every_override() {
        for var in ["NODES", "LISTEN", "METRICS_PATH", "COLLECT_TIMEOUT_SECS", "LOG_LEVEL"] {
            assert!(ENV_HELP.contains(&format!("{}{var}", storj_exporter::config::ENV_PREFIX)), "{var}");
        }
    }
}
