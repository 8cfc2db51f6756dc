//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::ebay::regions::Region;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Storefronts to search, in report order
    #[serde(default = "default_regions")]
    pub regions: Vec<Region>,

    /// Maximum number of products kept per region
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Output format for the terminal summary
    #[serde(default)]
    pub format: OutputFormat,

    /// Directory for reports written under their default name
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_regions() -> Vec<Region> {
    vec![Region::Us]
}

fn default_max_results() -> usize {
    5
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
            proxy: None,
            format: OutputFormat::Table,
            output_dir: None,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("price-compare").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides. Unparseable values are ignored.
    pub fn with_env(mut self) -> Self {
        if let Ok(regions) = std::env::var("PRICE_COMPARE_REGIONS") {
            let parsed: Result<Vec<Region>, _> = regions
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse::<Region>())
                .collect();
            match parsed {
                Ok(list) if !list.is_empty() => self.regions = list,
                _ => debug!("Ignoring invalid PRICE_COMPARE_REGIONS: {}", regions),
            }
        }

        if let Ok(proxy) = std::env::var("PRICE_COMPARE_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(timeout) = std::env::var("PRICE_COMPARE_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        if let Ok(max) = std::env::var("PRICE_COMPARE_MAX") {
            if let Ok(m) = max.parse() {
                self.max_results = m;
            }
        }

        self
    }
}

/// Output format for the terminal summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
