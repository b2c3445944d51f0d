///
/// Environment variable access.
///
/// Keys are validated up front: an empty key, or one containing `=` or NUL,
/// is rejected with `InvalidEnv` instead of being handed to the C runtime.
///

use osd_core::OsdError;

/// Value of `name`, or None if unset or not valid UTF-8.
pub fn getenv(name: &str) -> Option<String> {
    if validate_key(name).is_err() {
        return None;
    }
    std::env::var(name).ok()
}

/// Sets `name` to `value`. With `overwrite` false an existing value is kept.
pub fn setenv(name: &str, value: &str, overwrite: bool) -> Result<(), OsdError> {
    validate_key(name)?;
    if value.contains('\0') {
        return Err(OsdError::InvalidEnv {
            name: name.to_string(),
            reason: "value contains a NUL byte".to_string(),
        });
    }
    if !overwrite && std::env::var_os(name).is_some() {
        return Ok(());
    }
    // Environment writes race with concurrent getenv in C code; hosts call
    // this during start-up.
    unsafe { std::env::set_var(name, value) };
    Ok(())
}

pub fn unsetenv(name: &str) -> Result<(), OsdError> {
    validate_key(name)?;
    unsafe { std::env::remove_var(name) };
    Ok(())
}

fn validate_key(name: &str) -> Result<(), OsdError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.contains('=') {
        "name contains '='"
    } else if name.contains('\0') {
        "name contains a NUL byte"
    } else {
        return Ok(());
    };
    Err(OsdError::InvalidEnv {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}
