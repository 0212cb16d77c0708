use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable holding the web framework secret.
pub const ENV_SECRET_KEY: &str = "DATAREPORT_SECRET_KEY";
/// Environment variable enabling debug mode (`true` or `1`).
pub const ENV_DEBUG: &str = "DATAREPORT_DEBUG";

const DEFAULT_SECRET_KEY: &str = "a_secure_default_key";
const DEFAULT_MAX_FILE_SIZE: u64 = 150 * 1024 * 1024;

// ---------------------------------------------------------------------------
// ReportConfig
// ---------------------------------------------------------------------------

/// Application configuration stored at `~/.datareport/config.json`.
///
/// The secret key and debug flag come from the environment only and are
/// never written to the JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Upload ceiling in bytes.
    pub max_file_size: u64,
    /// Lowercase file extensions accepted for ingestion.
    pub allowed_extensions: Vec<String>,
    pub log_level: String,

    #[serde(skip)]
    pub secret_key: String,
    #[serde(skip)]
    pub debug: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_extensions: vec!["csv".into(), "xlsx".into()],
            log_level: "info".into(),
            secret_key: DEFAULT_SECRET_KEY.into(),
            debug: false,
        }
    }
}

impl ReportConfig {
    /// Returns the base config directory: `~/.datareport/`
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".datareport"))
    }

    /// Returns the config file path: `~/.datareport/config.json`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config.json"))
    }

    /// Returns the logs directory: `~/.datareport/logs/`
    pub fn logs_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("logs"))
    }

    /// Ensures all required directories exist.
    pub fn ensure_dirs() -> Result<()> {
        let dirs = [Self::base_dir()?, Self::logs_dir()?];
        for dir in &dirs {
            if !dir.exists() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            }
        }
        Ok(())
    }

    /// Loads config from disk, or creates default if missing, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        Self::ensure_dirs()?;
        let path = Self::config_path()?;
        let mut config = Self::load_from_path(&path)?;
        config.apply_env();
        Ok(config)
    }

    /// Load config from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Self =
                serde_json::from_str(&content).with_context(|| "Failed to parse config.json")?;
            info!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to_path(path)?;
            info!("Created default config at {}", path.display());
            Ok(config)
        }
    }

    /// Saves config to `path`. The secret key and debug flag are excluded.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Reads `DATAREPORT_SECRET_KEY` and `DATAREPORT_DEBUG` from the process
    /// environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Applies environment overrides using the given lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(secret) = lookup(ENV_SECRET_KEY).filter(|s| !s.is_empty()) {
            self.secret_key = secret;
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            self.debug = matches!(debug.to_lowercase().as_str(), "true" | "1");
        }
    }

    /// Whether `extension` (any case, without the dot) may be uploaded.
    pub fn is_allowed_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.allowed_extensions.iter().any(|e| *e == extension)
    }

    /// Upload ceiling in whole mebibytes, as shown to users.
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size / (1024 * 1024)
    }
}
