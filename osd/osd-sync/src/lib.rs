//!
//! osd-sync - Locks and Events
//!
//! ## Lock
//!
//! Recursive mutual exclusion. The owning thread may acquire again without
//! blocking and must release the same number of times:
//! - `Lock::new()` / `lock.destroy()`
//! - `lock.acquire()` - blocks until owned
//! - `lock.try_acquire() -> bool` - never blocks
//! - `lock.release() -> Result<(), OsdError>` - one level of ownership
//! - `lock.guard() -> LockGuard` - release on drop
//!
//! ## ScalableLock
//!
//! Same semantics as `Lock`; `acquire` hands out a `Slot` that `release`
//! takes back. The slot carries no state yet.
//!
//! ## Event
//!
//! A binary signal guarded by a mutex and condition variable:
//! - `Event::new(manual_reset, initial)` / `event.destroy()`
//! - `event.set()` - wakes one waiter (auto-reset) or all (manual-reset)
//! - `event.reset()` - clears the signal
//! - `event.wait(timeout_ticks) -> bool` - 0 polls, `WAIT_INFINITE` blocks
//!
//! ## C ABI
//!
//! `ffi` exports the `osd_lock_*`, `osd_scalable_lock_*` and `osd_event_*`
//! functions over boxed handles.
//!

pub mod event;
pub mod ffi;
pub mod lock;
pub mod scalable;

pub use event::*;
pub use lock::*;
pub use scalable::*;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, ignoring poison. The guarded state in this crate is plain
/// data that is never left half-updated across a panic.
pub(crate) fn lock_state<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
