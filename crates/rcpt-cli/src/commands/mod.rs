//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod output;
pub mod parse;
pub mod refine;

use std::path::{Path, PathBuf};

use tracing::debug;

use rcpt_core::RcptConfig;

/// Options shared by every subcommand.
pub struct GlobalOptions {
    pub config_path: Option<PathBuf>,
    pub api_key: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rcpt")
        .join("config.json")
}

impl GlobalOptions {
    /// The config file in effect: `--config` or the default location.
    pub fn config_file(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(default_config_path)
    }

    /// Load configuration and apply the API key override.
    ///
    /// An explicit `--config` path must exist; the default location is
    /// optional.
    pub fn load_config(&self) -> anyhow::Result<RcptConfig> {
        let config = match &self.config_path {
            Some(path) => read_config(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    read_config(&path)?
                } else {
                    RcptConfig::default()
                }
            }
        };

        let RcptConfig { extraction, refinement } = config;
        Ok(RcptConfig {
            extraction,
            refinement: refinement.with_api_key(self.api_key.clone()),
        })
    }
}

fn read_config(path: &Path) -> anyhow::Result<RcptConfig> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    debug!("Loading configuration from {}", path.display());
    Ok(RcptConfig::from_file(path)?)
}
