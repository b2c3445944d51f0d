//!
//! osd-threads - Native Threads
//!
//! One host callback per OS thread, no pooling. The context handed to
//! `spawn` is moved into the callback untouched and whatever the callback
//! returns comes back from `join`, which also makes everything the thread
//! wrote visible to the joiner.
//!
//! Threads inherit the creator's scheduling policy. `join` consumes the
//! handle, so a thread is joined exactly once; there is no cancellation.
//!

pub mod ffi;
pub mod thread;

pub use thread::*;
