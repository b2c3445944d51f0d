//!
//! osd-os - Host Process Utilities
//!
//! ## Processors
//!
//! - `cpu_count() -> u32` - Processors available to this process. A positive
//!   integer in `OSDPROCESSORS` wins; if the topology query fails the answer
//!   is 1, never 0.
//!
//! ## Process
//!
//! - `kill_self() -> !` - Terminates the process immediately with SIGKILL.
//!   No destructors, no atexit handlers.
//!
//! ## Environment
//!
//! - `getenv(name) -> Option<String>`
//! - `setenv(name, value, overwrite) -> Result<(), OsdError>`
//! - `unsetenv(name) -> Result<(), OsdError>`
//!
//! ## Clipboard
//!
//! - `Clipboard` trait with `NullClipboard` and `MemoryClipboard`
//!

pub mod clipboard;
pub mod env;
pub mod ffi;

pub use clipboard::*;
pub use env::*;

use std::num::NonZeroUsize;

use osd_core::{PROCESSORS_ENV, parse_processors};

pub fn cpu_count() -> u32 {
    let forced = getenv(PROCESSORS_ENV).and_then(|raw| parse_processors(&raw));
    resolve_cpu_count(forced, std::thread::available_parallelism().ok())
}

/// Picks the processor count from an override and the detected topology.
pub fn resolve_cpu_count(forced: Option<u32>, detected: Option<NonZeroUsize>) -> u32 {
    if let Some(n) = forced.filter(|&n| n > 0) {
        return n;
    }
    match detected {
        Some(n) => n.get().min(u32::MAX as usize) as u32,
        None => {
            tracing::debug!("processor topology unavailable, assuming 1");
            1
        }
    }
}

pub fn kill_self() -> ! {
    tracing::error!(pid = std::process::id(), "killing own process");
    #[cfg(unix)]
    {
        unsafe { libc::kill(libc::getpid(), libc::SIGKILL) };
    }
    std::process::abort()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_count_positive() {
        assert!(cpu_count() >= 1);
    }

    #[test]
    fn test_failed_query_falls_back_to_one() {
        assert_eq!(resolve_cpu_count(None, None), 1);
    }

    #[test]
    fn test_override_wins() {
        let detected = NonZeroUsize::new(16);
        assert_eq!(resolve_cpu_count(Some(2), detected), 2);
        assert_eq!(resolve_cpu_count(None, detected), 16);
        assert_eq!(resolve_cpu_count(Some(0), detected), 16);
        assert_eq!(resolve_cpu_count(Some(0), None), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_kill_self_sends_sigkill() {
        use std::os::unix::process::ExitStatusExt;

        if std::env::var_os("OSD_KILL_SELF_CHILD").is_some() {
            kill_self();
        }

        let exe = std::env::current_exe().unwrap();
        let status = std::process::Command::new(exe)
            .args(["--exact", "tests::test_kill_self_sends_sigkill", "--test-threads=1"])
            .env("OSD_KILL_SELF_CHILD", "1")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .unwrap();
        assert_eq!(status.signal(), Some(libc::SIGKILL));
    }
}
