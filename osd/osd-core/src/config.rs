///
/// # Configuration
///
/// Host-tunable settings for the platform layer. Every field has a default,
/// so an empty or missing `osd.toml` yields the stock behaviour.
///
/// ## Example osd.toml
///
/// ```toml
/// processors = 4
/// sleep_margin_ms = 2
/// log_level = "warn"
/// ```
///
/// ## Environment Overrides
///
/// Applied after the file is read:
/// - `OSDPROCESSORS` - positive integer replacing the detected CPU count
/// - `OSD_LOG_LEVEL` - one of trace, debug, info, warn, error
///

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::OsdError;

pub const PROCESSORS_ENV: &str = "OSDPROCESSORS";
pub const LOG_LEVEL_ENV: &str = "OSD_LOG_LEVEL";
pub const DEFAULT_SLEEP_MARGIN_MS: u32 = 2;

/// Reads an `OSDPROCESSORS` value. Non-numeric or zero values yield `None`,
/// so a variable left set to an empty string falls back to detection.
pub fn parse_processors(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|&n| n > 0)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OsdConfig {
    /// Overrides the processor count reported to the host.
    pub processors: Option<u32>,
    /// Milliseconds shaved off every sleep to absorb wakeup latency.
    pub sleep_margin_ms: u32,
    pub log_level: String,
}

impl Default for OsdConfig {
    fn default() -> Self {
        Self {
            processors: None,
            sleep_margin_ms: DEFAULT_SLEEP_MARGIN_MS,
            log_level: "warn".to_string(),
        }
    }
}

impl OsdConfig {
    /// Reads `path` and applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, OsdError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content).map_err(|e| match e {
            OsdError::InvalidConfig(reason) => OsdError::ConfigParse {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;
        config.apply_env()?;
        Ok(config)
    }

    /// Like `load`, but a missing file falls back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, OsdError> {
        if path.exists() {
            return Self::load(path);
        }
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, OsdError> {
        let config: OsdConfig =
            toml::from_str(content).map_err(|e| OsdError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), OsdError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), OsdError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(PROCESSORS_ENV) {
            match parse_processors(&raw) {
                Some(n) => self.processors = Some(n),
                None => tracing::debug!(value = %raw, "ignoring {}", PROCESSORS_ENV),
            }
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.log_level = level.trim().to_string();
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), OsdError> {
        if self.processors == Some(0) {
            return Err(OsdError::InvalidConfig(
                "processors must be at least 1".to_string(),
            ));
        }
        self.level()?;
        Ok(())
    }

    pub fn level(&self) -> Result<tracing::Level, OsdError> {
        tracing::Level::from_str(&self.log_level).map_err(|_| {
            OsdError::InvalidConfig(format!("unknown log level '{}'", self.log_level))
        })
    }

    pub fn to_toml_string(&self) -> Result<String, OsdError> {
        toml::to_string(self).map_err(|e| OsdError::InvalidConfig(e.to_string()))
    }
}
