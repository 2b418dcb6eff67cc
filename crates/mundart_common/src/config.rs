//! Configuration for the corpus client.
//!
//! Config file: ~/.config/mundart/config.toml, overridable via the
//! MUNDART_CONFIG environment variable. A missing file means defaults; an
//! unreadable or unparsable file is an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MundartConfig {
    /// Corpus API endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every corpus request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://bdo.badw.de/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!(
        "mundart/{} (+https://github.com/mundart-project/mundart)",
        env!("CARGO_PKG_VERSION")
    )
}

impl Default for MundartConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl MundartConfig {
    /// Load from the discovered path, falling back to defaults when no
    /// config file exists.
    pub fn load() -> Result<Self> {
        match Self::discover_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn discover_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("MUNDART_CONFIG") {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("mundart").join("config.toml"))
    }
}
