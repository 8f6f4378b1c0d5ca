use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
///
/// Loaded from a TOML file in the platform config directory; missing file
/// means defaults. Every field has a serde default so partial files work.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load config from the default location, or defaults if there is none
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Config file path: XDG on Linux/macOS, AppData on Windows
    fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::Config("Could not find config directory".into()))?
            .join("quoterack");

        Ok(config_dir.join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// The single collection endpoint to pull from and push to
    #[serde(default = "default_remote_url")]
    pub remote_url: String,

    /// Seconds between scheduled sync ticks
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Whether the periodic loop runs at all
    #[serde(default = "default_sync_enabled")]
    pub enabled: bool,
}

fn default_remote_url() -> String {
    "https://jsonplaceholder.typicode.com/posts".to_string()
}

fn default_interval_secs() -> u64 {
    30
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_sync_enabled() -> bool {
    true
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote_url: default_remote_url(),
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
            enabled: default_sync_enabled(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Database path; falls back to the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolve_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::Config("Could not find data directory".into()))?
            .join("quoterack");
        Ok(data_dir.join("quotes.db"))
    }
}
