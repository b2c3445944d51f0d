//!
//! Host context
//!
//! `OsdRuntime` is owned by the host and passed to whatever needs it; there
//! is no process-wide instance. It carries the configuration and the
//! clipboard source, and applies them to the operations they affect.
//!

use std::path::Path;

use osd_core::{OsdConfig, OsdError, Ticks, logging};
use osd_os::{Clipboard, NullClipboard};
use osd_time::TickClock;

pub struct OsdRuntime {
    config: OsdConfig,
    clipboard: Box<dyn Clipboard>,
}

impl OsdRuntime {
    pub fn new(config: OsdConfig) -> Result<Self, OsdError> {
        config.validate()?;
        tracing::debug!(
            processors = ?config.processors,
            sleep_margin_ms = config.sleep_margin_ms,
            log_level = %config.log_level,
            "osd runtime configured"
        );
        Ok(Self {
            config,
            clipboard: Box::new(NullClipboard),
        })
    }

    /// Loads `path` if present, applying environment overrides either way.
    pub fn from_config_file(path: &Path) -> Result<Self, OsdError> {
        Self::new(OsdConfig::load_or_default(path)?)
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn config(&self) -> &OsdConfig {
        &self.config
    }

    /// Installs the default stderr subscriber at the configured level.
    pub fn init_logging(&self) -> Result<bool, OsdError> {
        logging::init_from_config(&self.config)
    }

    /// The configured processor count, or `osd_os::cpu_count` when the
    /// config leaves it unset.
    pub fn cpu_count(&self) -> u32 {
        self.config.processors.unwrap_or_else(osd_os::cpu_count)
    }

    pub fn sleep(&self, duration: Ticks) {
        TickClock::sleep_with_margin(duration, self.config.sleep_margin_ms);
    }

    pub fn clipboard_text(&self) -> Option<String> {
        self.clipboard.text()
    }
}

impl std::fmt::Debug for OsdRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsdRuntime")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
