///
/// Native thread handles.
///
/// `Thread<T>` wraps a std join handle. Scheduling tweaks go straight to
/// pthreads through the handle's native id, the same calls a C host would
/// make.
///

use std::thread::{Builder, JoinHandle, ThreadId};

use osd_core::OsdError;

/// Creation-time knobs. Both fields fall back to the platform defaults.
#[derive(Debug, Clone, Default)]
pub struct ThreadOptions {
    pub name: Option<String>,
    pub stack_size: Option<usize>,
}

impl ThreadOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            stack_size: None,
        }
    }
}

#[derive(Debug)]
pub struct Thread<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Thread<T> {
    /// Runs `callback(context)` on a new OS thread.
    pub fn spawn<C, F>(context: C, callback: F) -> Result<Self, OsdError>
    where
        C: Send + 'static,
        F: FnOnce(C) -> T + Send + 'static,
    {
        Self::spawn_with(&ThreadOptions::default(), context, callback)
    }

    pub fn spawn_with<C, F>(options: &ThreadOptions, context: C, callback: F) -> Result<Self, OsdError>
    where
        C: Send + 'static,
        F: FnOnce(C) -> T + Send + 'static,
    {
        let mut builder = Builder::new();
        if let Some(name) = &options.name {
            if name.contains('\0') {
                return Err(OsdError::contract("thread name contains a NUL byte"));
            }
            builder = builder.name(name.clone());
        }
        if let Some(size) = options.stack_size {
            builder = builder.stack_size(size);
        }

        let handle = builder.spawn(move || callback(context)).map_err(|e| {
            tracing::error!(name = ?options.name, "thread creation failed: {}", e);
            OsdError::ThreadCreation(e)
        })?;

        Ok(Self { handle })
    }
}

impl<T> Thread<T> {
    pub fn id(&self) -> ThreadId {
        self.handle.thread().id()
    }

    pub fn name(&self) -> Option<&str> {
        self.handle.thread().name()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Adds `delta` to the thread's scheduling priority under its current
    /// policy. Returns false if the parameters cannot be read or written,
    /// e.g. without the privilege to raise priority.
    pub fn adjust_priority(&self, delta: i32) -> bool {
        #[cfg(unix)]
        {
            use std::os::unix::thread::JoinHandleExt;
            let native = self.handle.as_pthread_t() as libc::pthread_t;
            adjust_native_priority(native, delta)
        }
        #[cfg(not(unix))]
        {
            tracing::debug!(delta, "thread priority adjustment unsupported on this platform");
            false
        }
    }

    /// Whether `set_cpu_affinity` can succeed on this platform.
    pub fn supports_affinity() -> bool {
        false
    }

    /// Pins the thread to the CPUs in `mask`. Not supported; always false.
    pub fn set_cpu_affinity(&self, mask: u32) -> bool {
        tracing::debug!(mask, "cpu affinity is not supported");
        false
    }

    /// Blocks until the callback returns and hands back its result.
    pub fn join(self) -> Result<T, OsdError> {
        let name = self.name().unwrap_or("<unnamed>").to_string();
        self.handle
            .join()
            .map_err(|_| OsdError::ThreadPanicked { name })
    }
}

#[cfg(unix)]
fn adjust_native_priority(thread: libc::pthread_t, delta: i32) -> bool {
    let mut policy: libc::c_int = 0;
    let mut param: libc::sched_param = unsafe { std::mem::zeroed() };

    let rc = unsafe { libc::pthread_getschedparam(thread, &mut policy, &mut param) };
    if rc != 0 {
        tracing::debug!(rc, "pthread_getschedparam failed");
        return false;
    }

    param.sched_priority = param.sched_priority.saturating_add(delta);
    let rc = unsafe { libc::pthread_setschedparam(thread, policy, &param) };
    if rc != 0 {
        tracing::debug!(rc, policy, priority = param.sched_priority, "pthread_setschedparam failed");
        return false;
    }
    true
}
