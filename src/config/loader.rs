use crate::config::{validate, Config};
use crate::error::{Result, StatuslineError};
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Environment override for the config file location.
pub const CONFIG_PATH_ENV: &str = "CLAUDE_STATUSLINE_CONFIG";

const CONFIG_DIR_NAME: &str = ".claude-code-statusline";
const CONFIG_FILE_NAME: &str = "config.json";

/// `~/.claude-code-statusline/config.json`
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Resolve the config path with priority: CLI flag > env var > default.
pub fn resolve_config_path(cli_path: Option<PathBuf>) -> PathBuf {
    cli_path
        .or_else(|| env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

/// Loads, validates and persists the configuration file, caching the last
/// value read or written.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    cached: Option<Config>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the cached config, reading the file on first use.
    ///
    /// A missing or corrupt file yields the default configuration.
    pub async fn load(&mut self) -> Config {
        if let Some(config) = &self.cached {
            return config.clone();
        }
        self.reload().await
    }

    /// Bypasses the cache and re-reads the file.
    pub async fn reload(&mut self) -> Config {
        let config = self.read_from_disk().await;
        self.cached = Some(config.clone());
        config
    }

    async fn read_from_disk(&self) -> Config {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file at {}, using defaults", self.path.display());
                return Config::default();
            }
            Err(e) => {
                warn!("Could not read config file {}: {}", self.path.display(), e);
                warn!("Using default configuration instead");
                return Config::default();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(raw) => validate(&raw),
            Err(e) => {
                warn!("Config file {} contains invalid JSON: {}", self.path.display(), e);
                warn!("Using default configuration instead");
                Config::default()
            }
        }
    }

    /// Validates and writes the whole file, creating parent directories.
    /// Returns the configuration as persisted.
    pub async fn save(&mut self, config: &Config) -> Result<Config> {
        let raw = serde_json::to_value(config)
            .map_err(|e| StatuslineError::Config(format!("failed to serialize config: {}", e)))?;
        let validated = validate(&raw);

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }

        let json = serde_json::to_string_pretty(&validated)
            .map_err(|e| StatuslineError::Config(format!("failed to serialize config: {}", e)))?;

        // Write next to the target and rename so readers never see half a file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!("Saved configuration to {}", self.path.display());
        self.cached = Some(validated.clone());
        Ok(validated)
    }

    /// Writes the default configuration when no file exists yet.
    /// Returns whether a file was created.
    pub async fn ensure_exists(&mut self) -> Result<bool> {
        if fs::try_exists(&self.path).await? {
            return Ok(false);
        }
        self.save(&Config::default()).await?;
        Ok(true)
    }

    pub async fn reset(&mut self) -> Result<Config> {
        self.save(&Config::default()).await
    }
}
