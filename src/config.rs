use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

/// `${VAR}` reference inside a config file
static ENV_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}")
        .unwrap_or_else(|e| unreachable!("invalid env reference pattern: {e}"))
});

/// Prefix for every environment override
pub const ENV_PREFIX: &str = "STORJ_EXPORTER_";

/// Top-level configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub exporter: ExporterConfig,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExporterConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
    #[serde(default = "default_collect_timeout")]
    pub collect_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            metrics_path: default_metrics_path(),
            collect_timeout_secs: default_collect_timeout(),
            log_level: default_log_level(),
        }
    }
}

impl ExporterConfig {
    pub fn collect_timeout(&self) -> Duration {
        Duration::from_secs(self.collect_timeout_secs)
    }
}

/// One storage node dashboard
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub name: String,
    pub base_url: String,
}

impl Config {
    /// Load from an optional TOML file, then apply `STORJ_EXPORTER_*` overrides
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    fn load_with(path: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path))?;
                Self::parse(&content, &env)?
            }
            None => Config::default(),
        };

        config.apply_env(&env)?;
        config.validate()?;
        Ok(config)
    }

    fn parse(content: &str, env: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let expanded = expand_env_vars(content, env);
        toml::from_str(&expanded).with_context(|| "Failed to parse configuration")
    }

    fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |suffix: &str| env(&format!("{ENV_PREFIX}{suffix}"));

        if let Some(nodes) = var("NODES") {
            self.nodes = parse_nodes(&nodes)
                .with_context(|| format!("Invalid {ENV_PREFIX}NODES"))?;
        }
        if let Some(listen) = var("LISTEN") {
            self.exporter.listen = listen;
        }
        if let Some(path) = var("METRICS_PATH") {
            self.exporter.metrics_path = path;
        }
        if let Some(secs) = var("COLLECT_TIMEOUT_SECS") {
            self.exporter.collect_timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {ENV_PREFIX}COLLECT_TIMEOUT_SECS: {}", secs))?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.exporter.log_level = level;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            bail!("No nodes configured; add [[nodes]] to the config file or set {ENV_PREFIX}NODES");
        }

        let mut seen = HashSet::new();
        for node in &self.nodes {
            if node.name.trim().is_empty() {
                bail!("Node with base_url {} has an empty name", node.base_url);
            }
            if !seen.insert(node.name.as_str()) {
                bail!("Duplicate node name: {}", node.name);
            }
            let url = reqwest::Url::parse(&node.base_url).with_context(|| {
                format!("Invalid base_url for node {}: {}", node.name, node.base_url)
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                bail!("base_url for node {} must be http or https: {}", node.name, node.base_url);
            }
        }

        if self.exporter.collect_timeout_secs == 0 {
            bail!("collect_timeout_secs must be greater than zero");
        }
        if !self.exporter.metrics_path.starts_with('/') || self.exporter.metrics_path == "/" {
            bail!(
                "metrics_path must start with '/' and not be the root: {}",
                self.exporter.metrics_path
            );
        }

        Ok(())
    }
}

/// Parse `name=url,name=url`
fn parse_nodes(input: &str) -> Result<Vec<NodeConfig>> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, base_url) = entry
                .split_once('=')
                .with_context(|| format!("Expected name=url, got: {}", entry))?;
            Ok(NodeConfig {
                name: name.trim().to_string(),
                base_url: base_url.trim().to_string(),
            })
        })
        .collect()
}

/// Expand ${ENV_VAR} references in config string
fn expand_env_vars(input: &str, env: &impl Fn(&str) -> Option<String>) -> String {
    ENV_REF
        .replace_all(input, |caps: &regex::Captures| env(&caps[1]).unwrap_or_default())
        .to_string()
}

// Default value functions
fn default_listen() -> String { "0.0.0.0:9100".to_string() }
fn default_metrics_path() -> String { "/metrics".to_string() }
fn default_collect_timeout() -> u64 { 30 }
fn default_log_level() -> String { "info".to_string() }
