//!
//! Recursive Lock
//!
//! Ownership is tracked per thread: the holder's `ThreadId` plus a depth
//! counter, both behind a small mutex. Waiters park on a condition variable
//! until the depth drops back to zero.
//!
//! Usage:
//! ```
//! use osd_sync::Lock;
//!
//! let lock = Lock::new();
//! lock.acquire();
//! lock.acquire();
//! lock.release().unwrap();
//! lock.release().unwrap();
//! assert!(lock.try_acquire());
//! lock.release().unwrap();
//! lock.destroy();
//! ```
//!

use std::marker::PhantomData;
use std::sync::{Condvar, Mutex};
use std::thread::{self, ThreadId};

use osd_core::OsdError;

use crate::lock_state;

#[derive(Debug, Default)]
struct Ownership {
    owner: Option<ThreadId>,
    depth: usize,
}

#[derive(Debug, Default)]
pub struct Lock {
    state: Mutex<Ownership>,
    available: Condvar,
}

impl Lock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the calling thread owns the lock.
    pub fn acquire(&self) {
        let me = thread::current().id();
        let mut state = lock_state(&self.state);
        if state.owner == Some(me) {
            state.depth += 1;
            return;
        }
        while state.owner.is_some() {
            state = self
                .available
                .wait(state)
                .unwrap_or_else(std::sync::PoisonError::into_inner);
        }
        state.owner = Some(me);
        state.depth = 1;
    }

    pub fn try_acquire(&self) -> bool {
        let me = thread::current().id();
        let mut state = lock_state(&self.state);
        match state.owner {
            Some(owner) if owner == me => {
                state.depth += 1;
                true
            }
            Some(_) => false,
            None => {
                state.owner = Some(me);
                state.depth = 1;
                true
            }
        }
    }

    /// Releases one level of ownership held by the calling thread.
    pub fn release(&self) -> Result<(), OsdError> {
        let me = thread::current().id();
        let mut state = lock_state(&self.state);
        if state.owner != Some(me) {
            tracing::warn!(?me, owner = ?state.owner, "lock released by a non-owner");
            return Err(OsdError::contract(
                "lock released by a thread that does not hold it",
            ));
        }
        state.depth -= 1;
        if state.depth == 0 {
            state.owner = None;
            drop(state);
            self.available.notify_one();
        }
        Ok(())
    }

    pub fn guard(&self) -> LockGuard<'_> {
        self.acquire();
        LockGuard {
            lock: self,
            _not_send: PhantomData,
        }
    }

    pub fn is_held_by_current_thread(&self) -> bool {
        lock_state(&self.state).owner == Some(thread::current().id())
    }

    /// Nesting depth if the calling thread holds the lock, otherwise 0.
    pub fn hold_count(&self) -> usize {
        let state = lock_state(&self.state);
        if state.owner == Some(thread::current().id()) {
            state.depth
        } else {
            0
        }
    }

    pub fn is_locked(&self) -> bool {
        lock_state(&self.state).owner.is_some()
    }

    /// Drops every level the caller still holds, then frees the lock.
    pub fn destroy(self) {
        let state = self.state.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner);
        if state.depth > 0 {
            tracing::warn!(depth = state.depth, "destroying a lock that is still held");
        }
    }
}

/// Holds one level of a `Lock` until dropped.
///
/// The guard is bound to the thread that acquired it and cannot be sent
/// elsewhere:
///
/// ```compile_fail
/// use osd_sync::Lock;
///
/// let lock = Lock::new();
/// let guard = lock.guard();
/// std::thread::scope(|s| {
///     s.spawn(move || drop(guard));
/// });
/// ```
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a> {
    lock: &'a Lock,
    // Ownership is per thread, so the guard must be released where it was taken.
    _not_send: PhantomData<*const ()>,
}

impl std::fmt::Debug for LockGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").field("lock", self.lock).finish()
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.lock.release() {
            tracing::error!("lock guard release failed: {}", e);
            debug_assert!(false, "lock guard released off its owning thread");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::time::Duration;

    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn held_elsewhere(lock: &Arc<Lock>) -> bool {
        let lock = Arc::clone(lock);
        thread::spawn(move || {
            let got = lock.try_acquire();
            if got {
                lock.release().unwrap();
            }
            !got
        })
        .join()
        .unwrap()
    }

    #[test]
    fn test_recursive_acquire_release() {
        for n in 1..=8 {
            let lock = Arc::new(Lock::new());
            for _ in 0..n {
                lock.acquire();
            }
            assert_eq!(lock.hold_count(), n);
            for _ in 0..n {
                lock.release().unwrap();
            }
            assert!(!lock.is_locked());
            assert!(!held_elsewhere(&lock));
        }
    }

    #[test]
    fn test_partial_release_keeps_lock() {
        for n in 2..=6 {
            let lock = Arc::new(Lock::new());
            for _ in 0..n {
                lock.acquire();
            }
            for _ in 0..n - 1 {
                lock.release().unwrap();
            }
            assert!(lock.is_held_by_current_thread());
            assert!(held_elsewhere(&lock));
            lock.release().unwrap();
        }
    }

    #[test]
    fn test_try_acquire_is_recursive() {
        let lock = Lock::new();
        assert!(lock.try_acquire());
        assert!(lock.try_acquire());
        assert_eq!(lock.hold_count(), 2);
        lock.release().unwrap();
        lock.release().unwrap();
        assert_eq!(lock.hold_count(), 0);
    }

    #[test]
    fn test_release_without_holding() {
        let lock = Lock::new();
        let err = lock.release().unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_release_from_other_thread() {
        let lock = Arc::new(Lock::new());
        lock.acquire();
        let other = Arc::clone(&lock);
        let result = thread::spawn(move || other.release()).join().unwrap();
        assert!(result.unwrap_err().is_contract_violation());
        assert!(lock.is_held_by_current_thread());
        lock.release().unwrap();
    }

    #[test]
    fn test_try_acquire_race_has_one_winner() {
        for _ in 0..50 {
            let lock = Arc::new(Lock::new());
            let barrier = Arc::new(Barrier::new(2));
            let done = Arc::new(Barrier::new(2));

            let handles: Vec<_> = (0..2)
                .map(|_| {
                    let lock = Arc::clone(&lock);
                    let barrier = Arc::clone(&barrier);
                    let done = Arc::clone(&done);
                    thread::spawn(move || {
                        barrier.wait();
                        let got = lock.try_acquire();
                        // hold until both threads have tried
                        done.wait();
                        if got {
                            lock.release().unwrap();
                        }
                        got
                    })
                })
                .collect();

            let wins = handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|&got| got)
                .count();
            assert_eq!(wins, 1);
        }
    }

    #[test]
    fn test_acquire_blocks_until_release() {
        let lock = Arc::new(Lock::new());
        lock.acquire();

        let waiter = {
            let lock = Arc::clone(&lock);
            thread::spawn(move || {
                lock.acquire();
                lock.release().unwrap();
            })
        };

        thread::sleep(Duration::from_millis(30));
        assert!(!waiter.is_finished());
        lock.release().unwrap();
        waiter.join().unwrap();
    }

    #[test]
    fn test_lock_concurrent() {
        let lock = Arc::new(Lock::new());
        let counter = Arc::new(Mutex::new(0u64));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lock = Arc::clone(&lock);
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let _outer = lock.guard();
                        let _inner = lock.guard();
                        let mut value = counter.lock().unwrap();
                        *value += 1;
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*counter.lock().unwrap(), 1600);
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_destroy_held_lock_warns() {
        let output = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&output);
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || CapturedLog(Arc::clone(&sink)))
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let lock = Lock::new();
            lock.acquire();
            lock.acquire();
            lock.destroy();

            let idle = Lock::new();
            idle.destroy();
        });

        let text = String::from_utf8(output.lock().unwrap().clone()).unwrap();
        assert_eq!(text.matches("destroying a lock that is still held").count(), 1);
        assert!(text.contains("depth=2"));
    }

    #[test]
    fn test_guard_is_released_on_owning_thread() {
        let lock = Arc::new(Lock::new());
        {
            let _outer = lock.guard();
            let _inner = lock.guard();
            assert_eq!(lock.hold_count(), 2);
        }
        assert!(!lock.is_locked());
        assert!(!held_elsewhere(&lock));
    }
}
