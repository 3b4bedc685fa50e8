// ABOUTME: Configuration types and parsing for vigla.yml.
// ABOUTME: Handles YAML parsing, env var interpolation, and file discovery.

mod env_value;
mod host;

pub use env_value::EnvValue;
pub use host::HostConfig;

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "vigla.yml";
pub const CONFIG_FILENAME_ALT: &str = "vigla.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".vigla/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub remote: HostConfig,

    #[serde(default)]
    pub deploy_logs: DeployLogConfig,

    #[serde(default)]
    pub transfer: Option<TransferConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployLogConfig {
    #[serde(default = "default_log_dir")]
    pub dir: String,

    #[serde(default, with = "humantime_serde")]
    pub command_timeout: Option<Duration>,
}

impl Default for DeployLogConfig {
    fn default() -> Self {
        DeployLogConfig {
            dir: default_log_dir(),
            command_timeout: None,
        }
    }
}

fn default_log_dir() -> String {
    "/var/log/deployments".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransferConfig {
    pub credentials_file: PathBuf,
    pub bucket: String,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }
}
