//! Main configuration structure and implementation

use anyhow::{anyhow, Context, Result};
use apidocs_mock::MockConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::utils;

/// File names searched for in the working directory
pub const CONFIG_FILE_NAMES: [&str; 2] = ["apidocs.yaml", ".apidocs.yaml"];

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port used in the cluster-local fallback URL
    pub port: u16,

    /// Public base URL; overrides the cluster-local fallback when set
    pub external_url: Option<String>,

    /// Directory persisted documents are written to
    pub spec_directory: PathBuf,

    /// Service name used in the cluster-local fallback URL
    pub service_name: String,

    /// Optional timeout for remote fetches, unbounded when unset
    pub fetch_timeout_secs: Option<u64>,

    /// Example synthesis settings
    pub mock: MockConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            external_url: None,
            spec_directory: PathBuf::from("/tmp/apidocs-specs"),
            service_name: "apidocs".to_string(),
            fetch_timeout_secs: None,
            mock: MockConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {path:?}"))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {path:?}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the first configuration found, or defaults.
    ///
    /// An explicit path must exist. Otherwise the working directory and then
    /// the user config directory are searched.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        for path in Self::search_paths() {
            if path.is_file() {
                debug!("Using configuration file {:?}", path);
                return Self::from_file(&path);
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Candidate configuration files, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = CONFIG_FILE_NAMES.iter().map(PathBuf::from).collect();
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("apidocs").join("config.yaml"));
        }
        paths
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port must be non-zero"));
        }

        if let Some(url) = &self.external_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!(
                    "external_url must start with http:// or https://: {}",
                    url
                ));
            }
        }

        if self.spec_directory.as_os_str().is_empty() {
            return Err(anyhow!("spec_directory must not be empty"));
        }

        if self.service_name.is_empty() {
            return Err(anyhow!("service_name must not be empty"));
        }

        if self.mock.max_depth == 0 {
            return Err(anyhow!("mock.max_depth must be at least 1"));
        }

        Ok(())
    }

    /// Spec directory with `~` and environment variables expanded
    pub fn resolved_spec_directory(&self) -> Result<PathBuf> {
        let raw = self.spec_directory.to_string_lossy();
        utils::expand_path(&raw)
            .map_err(|e| anyhow!("Failed to expand spec directory {}: {}", raw, e))
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    /// Base URL documents are published under for `namespace`
    pub fn base_url(&self, namespace: &str) -> String {
        match &self.external_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!(
                "http://{}.{}.svc:{}",
                self.service_name, namespace, self.port
            ),
        }
    }
}
