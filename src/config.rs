//! Configuration for the voice registration dialogue
//!
//! Settings are stored as JSON with schema versioning and migrations. The
//! default location is `<config dir>/voice-registration/config.json`. There
//! is no process-wide config instance: hosts load a [`Config`] and pass the
//! relevant sections to the dialogue and to [`init_logging`](crate::init_logging).

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Current config schema version
const CURRENT_VERSION: u32 = 1;

/// Longest accepted pause timeout (5 minutes)
const MAX_PAUSE_TIMEOUT_MS: u64 = 300_000;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema version for migrations
    pub version: u32,
    /// Speech recogniser settings
    pub speech: SpeechConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            speech: SpeechConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Speech recogniser configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Recogniser locale (BCP 47)
    pub locale: String,
    /// Deliver partial results (the dialogue only uses final ones)
    pub interim_results: bool,
    /// Alternatives requested per result
    pub max_alternatives: u32,
    /// Pause before an unanswered session times out, in milliseconds
    pub pause_timeout_ms: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            locale: "sk-SK".to_string(),
            interim_results: false,
            max_alternatives: 1,
            pause_timeout_ms: 7_000,
        }
    }
}

impl SpeechConfig {
    pub fn pause_timeout(&self) -> Duration {
        Duration::from_millis(self.pause_timeout_ms)
    }
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Append logs to this file as well as stdout
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: None,
        }
    }
}

/// Get the default config file path (`<config dir>/voice-registration/config.json`)
pub fn default_config_path() -> PathBuf {
    config_dir_or_fallback()
        .join("voice-registration")
        .join("config.json")
}

/// Get the platform config directory, falling back to the temp dir
fn config_dir_or_fallback() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| {
        tracing::error!("Could not determine config directory, using temp dir");
        std::env::temp_dir()
    })
}

impl Config {
    /// Load configuration from `path`, using defaults when it does not exist.
    ///
    /// Older schema versions are migrated and written back.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::info!("Config file not found at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        let original_version = config.version;
        let config = migrate_config(config)?;
        if config.version != original_version {
            tracing::info!(
                "Migrated config from version {} to {}",
                original_version,
                config.version
            );
            config.save(path)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Write configuration to `path` as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory {}", dir.display())
            })?;
        }

        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialise config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        tracing::info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Reject values the dialogue cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        let speech = &self.speech;
        if speech.locale.trim().is_empty() {
            bail!("speech.locale must not be empty");
        }
        if speech.max_alternatives == 0 {
            bail!("speech.max_alternatives must be at least 1");
        }
        if !(1..=MAX_PAUSE_TIMEOUT_MS).contains(&speech.pause_timeout_ms) {
            bail!(
                "speech.pause_timeout_ms must be between 1 and {} (got {})",
                MAX_PAUSE_TIMEOUT_MS,
                speech.pause_timeout_ms
            );
        }
        if self.logging.level.trim().is_empty() {
            bail!("logging.level must not be empty");
        }
        Ok(())
    }
}

/// Migrate configuration from older schema versions
fn migrate_config(mut config: Config) -> anyhow::Result<Config> {
    if config.version > CURRENT_VERSION {
        bail!("Unknown config version: {}", config.version);
    }
    while config.version < CURRENT_VERSION {
        config = apply_migration(config)?;
    }
    Ok(config)
}

/// Apply a single migration step
fn apply_migration(config: Config) -> anyhow::Result<Config> {
    match config.version {
        // Version 0 -> 1: sections gained serde defaults, nothing to move
        0 => Ok(Config {
            version: 1,
            ..config
        }),
        v => bail!("Unknown config version: {}", v),
    }
}
