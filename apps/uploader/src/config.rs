//! Uploader configuration.
//!
//! Stored as TOML. Lookup order:
//! 1. `--config PATH`
//! 2. `$CHUNKUP_CONFIG`
//! 3. the platform config path (created with defaults if missing):
//!    - Linux: `~/.config/chunkup/uploader.toml`
//!    - Windows: `%APPDATA%/chunkup/uploader.toml`
//!    - macOS: `~/Library/Application Support/chunkup/uploader.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chunkup_transfer::{DEFAULT_BLOCK_COUNT, UrlTemplate};
use serde::{Deserialize, Serialize};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "CHUNKUP_CONFIG";

/// Uploader configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL that relative request URLs are resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request URL template with `{filename}` and `{progress}` placeholders.
    #[serde(default)]
    pub url: UrlTemplate,

    /// Number of blocks each file is split into.
    #[serde(default = "default_blocks")]
    pub blocks: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/upload".into()
}

fn default_blocks() -> u64 {
    DEFAULT_BLOCK_COUNT
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            url: UrlTemplate::default(),
            blocks: default_blocks(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads the configuration following the lookup order above.
    ///
    /// An explicitly named file (flag or environment) must exist; only the
    /// default location is created on demand.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }

        let path = config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Config::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Reads and validates the file at `path`.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.blocks > 0, "blocks must be at least 1");
        anyhow::ensure!(self.timeout_secs > 0, "timeout_secs must be at least 1");
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Nominal block size for a file of `total` bytes.
    pub fn block_size(&self, total: u64) -> u64 {
        total / self.blocks.max(1)
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("chunkup")
            .join("uploader.toml")
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("chunkup").join("uploader.toml")
    }

    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join("chunkup")
            .join("uploader.toml")
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        PathBuf::from("/tmp/chunkup/uploader.toml")
    }
}
