//!
//! Logging bootstrap
//!
//! The primitives only emit `tracing` events; installing a subscriber is the
//! host's call. Hosts without one can use `init`, which writes plain text to
//! stderr so it never interleaves with a host's stdout protocol.
//!

use tracing::Level;

use crate::config::OsdConfig;
use crate::error::OsdError;

/// Installs the stderr subscriber. Returns false if one was already set.
pub fn init(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .is_ok()
}

pub fn init_from_config(config: &OsdConfig) -> Result<bool, OsdError> {
    Ok(init(config.level()?))
}
