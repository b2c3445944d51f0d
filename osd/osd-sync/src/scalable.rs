//!
//! Scalable Lock
//!
//! A `Lock` behind an acquire/release pair that trades a `Slot`. Hosts
//! written against this interface keep working if the lock later grows a
//! ticket or per-core slot scheme.
//!

use osd_core::OsdError;

use crate::lock::Lock;

/// Token handed out by `ScalableLock::acquire` and returned on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    _reserved: (),
}

impl Slot {
    pub(crate) const fn reserved() -> Slot {
        Slot { _reserved: () }
    }

    /// The integer form used by the C ABI.
    pub fn index(self) -> i32 {
        0
    }
}

#[derive(Debug, Default)]
pub struct ScalableLock {
    lock: Lock,
}

impl ScalableLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> Slot {
        self.lock.acquire();
        Slot::reserved()
    }

    pub fn release(&self, _slot: Slot) -> Result<(), OsdError> {
        self.lock.release()
    }

    pub fn destroy(self) {
        self.lock.destroy();
    }
}
