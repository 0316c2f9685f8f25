//! Errors surfaced by file and configuration operations.
//!
//! Editing itself never fails: out-of-range coordinates are clamped and an
//! empty history is a no-op. Only the outside world (files, user-supplied
//! options) produces an [`Error`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Save requested on a buffer that is not bound to a file.
    #[error("No file name")]
    NoFileName,

    /// Plain save requires the bound file to still exist.
    #[error("File no longer exists: {}", .0.display())]
    FileMissing(PathBuf),

    #[error("Invalid option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },
}

impl Error {
    pub(crate) fn invalid_option(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
