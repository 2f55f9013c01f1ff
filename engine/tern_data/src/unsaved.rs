//! In-memory buffers overriding on-disk file contents.

use std::path::PathBuf;

/// An unsaved editor buffer handed to the parser in place of the file on
/// disk. Value type; never retained past the call that consumes it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnsavedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl UnsavedFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        UnsavedFile {
            path: path.into(),
            contents: contents.into(),
        }
    }
}
