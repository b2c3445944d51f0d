//!
//! osd Runtime Library
//!
//! One crate for hosts to link against. Rust hosts use the re-exported safe
//! API; C and Objective-C hosts link `libosd_runtime.a` and call the `osd_*`
//! functions collected in `ffi`.
//!
//! Contains:
//! - Ticks, errors and configuration (osd-core)
//! - TickClock (osd-time)
//! - Lock, ScalableLock, Event (osd-sync)
//! - Thread (osd-threads)
//! - cpu_count, kill_self, env, clipboard (osd-os)
//! - stat, full_path, volume_name (osd-fs)
//! - `OsdRuntime`, which binds an `OsdConfig` to the operations it tunes
//!

mod runtime;

pub use runtime::OsdRuntime;

pub use osd_core::{OsdConfig, OsdError, Ticks, WAIT_INFINITE, logging};
pub use osd_fs::{DirectoryEntry, EntryKind, full_path, stat, volume_name};
pub use osd_os::{
    Clipboard, MemoryClipboard, NullClipboard, cpu_count, getenv, kill_self, resolve_cpu_count,
    setenv, unsetenv,
};
pub use osd_sync::{Event, EventState, Lock, LockGuard, ResetMode, ScalableLock, Slot};
pub use osd_threads::{Thread, ThreadOptions};
pub use osd_time::{TickClock, Timebase, duration_to_ticks, sleep_interval, ticks_to_duration};

/// Every `osd_*` C entry point.
pub mod ffi {
    pub use osd_os::ffi::*;
    pub use osd_sync::ffi::*;
    pub use osd_threads::ffi::*;
    pub use osd_time::ffi::*;
}
