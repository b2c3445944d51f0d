//!
//! C ABI for locks and events
//!
//! Handles are boxed Rust objects passed to C as opaque pointers. Every
//! entry point tolerates NULL. Misuse that the safe API reports as an error
//! (releasing a lock the caller does not hold) is logged and ignored here,
//! since the C signatures have no error channel.
//!

use std::ffi::c_int;

use osd_core::Ticks;

use crate::{Event, Lock, ScalableLock, Slot};

#[unsafe(no_mangle)]
pub extern "C" fn osd_lock_alloc() -> *mut Lock {
    Box::into_raw(Box::new(Lock::new()))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_lock_acquire(lock: *mut Lock) {
    if let Some(lock) = unsafe { lock.as_ref() } {
        lock.acquire();
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_lock_try(lock: *mut Lock) -> c_int {
    match unsafe { lock.as_ref() } {
        Some(lock) => lock.try_acquire() as c_int,
        None => 0,
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_lock_release(lock: *mut Lock) {
    if let Some(lock) = unsafe { lock.as_ref() } {
        if let Err(e) = lock.release() {
            tracing::error!("osd_lock_release: {}", e);
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_lock_free(lock: *mut Lock) {
    if !lock.is_null() {
        let lock = unsafe { Box::from_raw(lock) };
        lock.destroy();
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn osd_scalable_lock_alloc() -> *mut ScalableLock {
    Box::into_raw(Box::new(ScalableLock::new()))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_scalable_lock_acquire(lock: *mut ScalableLock) -> i32 {
    match unsafe { lock.as_ref() } {
        Some(lock) => lock.acquire().index(),
        None => 0,
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_scalable_lock_release(lock: *mut ScalableLock, _myslot: i32) {
    if let Some(lock) = unsafe { lock.as_ref() } {
        // Only one slot value exists today; the caller's integer is not checked.
        if let Err(e) = lock.release(Slot::reserved()) {
            tracing::error!("osd_scalable_lock_release: {}", e);
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_scalable_lock_free(lock: *mut ScalableLock) {
    if !lock.is_null() {
        let lock = unsafe { Box::from_raw(lock) };
        lock.destroy();
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn osd_event_alloc(manualreset: c_int, initialstate: c_int) -> *mut Event {
    Box::into_raw(Box::new(Event::new(manualreset != 0, initialstate != 0)))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_event_set(event: *mut Event) {
    if let Some(event) = unsafe { event.as_ref() } {
        event.set();
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_event_reset(event: *mut Event) {
    if let Some(event) = unsafe { event.as_ref() } {
        event.reset();
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_event_wait(event: *mut Event, timeout: Ticks) -> c_int {
    match unsafe { event.as_ref() } {
        Some(event) => event.wait(timeout) as c_int,
        None => 0,
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_event_free(event: *mut Event) {
    if !event.is_null() {
        let event = unsafe { Box::from_raw(event) };
        event.destroy();
    }
}
