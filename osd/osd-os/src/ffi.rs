//!
//! C ABI for host process utilities
//!
//! Strings returned to C are heap-allocated copies that the caller releases
//! with `osd_string_free`.
//!

use std::ffi::{CStr, CString, c_char, c_int};

use crate::{cpu_count, getenv, kill_self, setenv};

unsafe fn str_from_c<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(s) }.to_str().ok()
}

#[unsafe(no_mangle)]
pub extern "C" fn osd_get_num_processors() -> c_int {
    cpu_count().min(c_int::MAX as u32) as c_int
}

#[unsafe(no_mangle)]
pub extern "C" fn osd_process_kill() {
    kill_self()
}

/// Returns a copy of the variable's value, or NULL if unset.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_getenv(name: *const c_char) -> *mut c_char {
    let Some(name) = (unsafe { str_from_c(name) }) else {
        return std::ptr::null_mut();
    };
    getenv(name)
        .and_then(|value| CString::new(value).ok())
        .map_or(std::ptr::null_mut(), CString::into_raw)
}

/// Returns 0 on success and -1 on an invalid name or value.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_setenv(
    name: *const c_char,
    value: *const c_char,
    overwrite: c_int,
) -> c_int {
    let (Some(name), Some(value)) = (unsafe { str_from_c(name) }, unsafe { str_from_c(value) }) else {
        return -1;
    };
    match setenv(name, value, overwrite != 0) {
        Ok(()) => 0,
        Err(e) => {
            tracing::warn!("osd_setenv: {}", e);
            -1
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn osd_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}
