//!
//! Auto-reset and Manual-reset Events
//!
//! The signal flag only changes while the event's mutex is held. An
//! auto-reset wait clears the flag inside the same critical section that
//! observed it set, so one `set` releases at most one waiter. A manual-reset
//! event stays signalled, releasing every waiter, until `reset`.
//!
//! Timed waits compute their deadline once on entry and re-block after
//! spurious wakeups until either the flag is seen set or the deadline has
//! passed.
//!

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use osd_core::{Ticks, WAIT_INFINITE};
use osd_time::{TickClock, ticks_to_duration};

use crate::lock_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    Auto,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventState {
    Clear,
    Signalled,
}

#[derive(Debug)]
pub struct Event {
    signalled: Mutex<bool>,
    cond: Condvar,
    mode: ResetMode,
}

impl Event {
    pub fn new(manual_reset: bool, initial_signalled: bool) -> Self {
        Self {
            signalled: Mutex::new(initial_signalled),
            cond: Condvar::new(),
            mode: if manual_reset {
                ResetMode::Manual
            } else {
                ResetMode::Auto
            },
        }
    }

    pub fn auto_reset(initial_signalled: bool) -> Self {
        Self::new(false, initial_signalled)
    }

    pub fn manual_reset(initial_signalled: bool) -> Self {
        Self::new(true, initial_signalled)
    }

    pub fn mode(&self) -> ResetMode {
        self.mode
    }

    pub fn state(&self) -> EventState {
        if *lock_state(&self.signalled) {
            EventState::Signalled
        } else {
            EventState::Clear
        }
    }

    pub fn set(&self) {
        let mut signalled = lock_state(&self.signalled);
        if *signalled {
            return;
        }
        *signalled = true;
        match self.mode {
            ResetMode::Auto => self.cond.notify_one(),
            ResetMode::Manual => self.cond.notify_all(),
        }
    }

    pub fn reset(&self) {
        *lock_state(&self.signalled) = false;
    }

    /// Waits up to `timeout` ticks for the signal.
    ///
    /// A timeout of 0 polls without blocking; `WAIT_INFINITE` waits with no
    /// deadline. Returns false only when the deadline passed unsignalled.
    pub fn wait(&self, timeout: Ticks) -> bool {
        match timeout {
            0 => self.wait_until(None, true),
            WAIT_INFINITE => self.wait_until(None, false),
            ticks => {
                let duration = ticks_to_duration(ticks, TickClock::ticks_per_second());
                self.wait_timeout(duration)
            }
        }
    }

    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        // A deadline past the end of Instant's range is as good as none.
        let deadline = Instant::now().checked_add(timeout);
        self.wait_until(deadline, timeout.is_zero())
    }

    pub fn wait_forever(&self) {
        self.wait_until(None, false);
    }

    fn wait_until(&self, deadline: Option<Instant>, poll: bool) -> bool {
        let mut signalled = lock_state(&self.signalled);
        if !*signalled && poll {
            return false;
        }
        while !*signalled {
            match deadline {
                None => {
                    signalled = self
                        .cond
                        .wait(signalled)
                        .unwrap_or_else(PoisonError::into_inner);
                }
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    let (guard, _) = self
                        .cond
                        .wait_timeout(signalled, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner);
                    signalled = guard;
                }
            }
        }
        if self.mode == ResetMode::Auto {
            *signalled = false;
        }
        true
    }

    /// Frees the event. No thread may still be waiting on it.
    pub fn destroy(self) {
        drop(self);
    }
}
