//!
//! osd-core - Shared Types
//!
//! This crate provides the types shared across all osd crates:
//!
//! - `Ticks` for monotonic clock values and timeouts
//! - `OsdError` for every fallible operation of the safe API
//! - `OsdConfig` for host-tunable behaviour (processor override, sleep margin)
//! - `logging::init` for hosts that want the default stderr subscriber
//!
//! Nothing in here holds global state. Hosts construct what they need and
//! pass it down explicitly.
//!

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;

/// Platform-defined monotonic time unit.
pub type Ticks = u64;

/// Timeout value requesting a wait with no deadline.
pub const WAIT_INFINITE: Ticks = Ticks::MAX;
