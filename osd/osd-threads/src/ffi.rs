//!
//! C ABI for threads
//!
//! ```c
//! osd_thread *t = osd_thread_create(worker_main, &state);
//! osd_thread_adjust_priority(t, -1);
//! osd_thread_wait_free(t);
//! ```
//!
//! The callback's return value is discarded, as in the native layer.
//!

use std::ffi::{c_int, c_void};

use crate::Thread;

pub type OsdThreadCallback = extern "C" fn(*mut c_void) -> *mut c_void;

struct CallbackParam(*mut c_void);

// The pointer is opaque to us; the host owns whatever it points at.
unsafe impl Send for CallbackParam {}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_thread_create(
    callback: Option<OsdThreadCallback>,
    cbparam: *mut c_void,
) -> *mut Thread<()> {
    let Some(callback) = callback else {
        tracing::error!("osd_thread_create: NULL callback");
        return std::ptr::null_mut();
    };

    match Thread::spawn(CallbackParam(cbparam), move |param: CallbackParam| {
        callback(param.0);
    }) {
        Ok(thread) => Box::into_raw(Box::new(thread)),
        Err(_) => std::ptr::null_mut(),
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_thread_adjust_priority(thread: *mut Thread<()>, adjust: c_int) -> c_int {
    match unsafe { thread.as_ref() } {
        Some(thread) => thread.adjust_priority(adjust) as c_int,
        None => 0,
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_thread_cpu_affinity(thread: *mut Thread<()>, mask: u32) -> c_int {
    match unsafe { thread.as_ref() } {
        Some(thread) => thread.set_cpu_affinity(mask) as c_int,
        None => 0,
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_thread_wait_free(thread: *mut Thread<()>) {
    if thread.is_null() {
        return;
    }
    let thread = unsafe { Box::from_raw(thread) };
    if let Err(e) = thread.join() {
        tracing::error!("osd_thread_wait_free: {}", e);
    }
}
