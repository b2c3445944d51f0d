//!
//! osd-fs - Filesystem Queries
//!
//! ## Functions
//!
//! - `stat(path) -> Option<DirectoryEntry>` - Name, kind and size, or None
//!   if the path does not exist
//! - `full_path(path) -> Result<PathBuf, OsdError>` - Absolute paths pass
//!   through; relative ones are joined onto the current directory without
//!   touching the filesystem further
//! - `volume_name(index) -> Option<&str>` - Mounted volume roots by index
//!
//! Symlinks are followed, so a link to a directory reports `Dir`.
//!

use std::path::{Path, PathBuf};

use osd_core::OsdError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// The path as given to `stat`.
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
}

pub fn stat(path: impl AsRef<Path>) -> Option<DirectoryEntry> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path).ok()?;
    Some(DirectoryEntry {
        name: path.to_string_lossy().into_owned(),
        kind: if metadata.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        },
        size: metadata.len(),
    })
}

pub fn full_path(path: impl AsRef<Path>) -> Result<PathBuf, OsdError> {
    let path = path.as_ref();
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| {
        tracing::warn!("cannot resolve current directory: {}", e);
        OsdError::Io(e)
    })?;
    Ok(cwd.join(path))
}

pub fn volume_name(index: usize) -> Option<&'static str> {
    #[cfg(unix)]
    {
        (index == 0).then_some("/")
    }
    #[cfg(not(unix))]
    {
        let _ = index;
        None
    }
}
