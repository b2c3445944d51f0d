//!
//! Clipboard access
//!
//! The platform layer does not talk to a window system. A host that has a
//! clipboard implements `Clipboard` over it; headless hosts use
//! `NullClipboard`, and tests or scripted hosts use `MemoryClipboard`.
//!

use std::sync::{Mutex, PoisonError};

pub trait Clipboard: Send + Sync {
    /// Current clipboard contents as UTF-8, or None if empty or not text.
    fn text(&self) -> Option<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullClipboard;

impl Clipboard for NullClipboard {
    fn text(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.into());
    }

    pub fn clear(&self) {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Clipboard for MemoryClipboard {
    fn text(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
