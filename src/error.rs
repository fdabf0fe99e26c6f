//! Error types for the tailer.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// The main error type for tail operations.
///
/// Causes are held behind `Arc` so the terminal error of a [`Tailer`](crate::Tailer)
/// can be read any number of times.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The file could not be opened or positioned when following started.
    #[error("tail: cannot follow {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: Arc<io::Error>,
    },

    /// Reading from the followed file failed.
    #[error("read error: {0}")]
    Read(#[source] Arc<io::Error>),

    /// Querying or moving the read position failed.
    #[error("seek error: {0}")]
    Seek(#[source] Arc<io::Error>),

    /// Metadata of the held file handle could not be read.
    #[error("stat error: {0}")]
    Stat(#[source] Arc<io::Error>),

    /// File watching errors from the notify crate.
    #[error("file watcher error: {0}")]
    Watcher(#[source] Arc<notify::Error>),

    /// File path errors.
    #[error("invalid file path: {message}")]
    InvalidPath { message: String },
}

impl Error {
    pub(crate) fn open(path: &Path, source: io::Error) -> Self {
        Error::Open {
            path: path.to_path_buf(),
            source: Arc::new(source),
        }
    }

    pub(crate) fn read(source: io::Error) -> Self {
        Error::Read(Arc::new(source))
    }

    pub(crate) fn seek(source: io::Error) -> Self {
        Error::Seek(Arc::new(source))
    }

    pub(crate) fn stat(source: io::Error) -> Self {
        Error::Stat(Arc::new(source))
    }

    /// True when following never started because the file could not be opened.
    pub fn is_open_failure(&self) -> bool {
        matches!(self, Error::Open { .. })
    }
}

impl From<notify::Error> for Error {
    fn from(error: notify::Error) -> Self {
        Error::Watcher(Arc::new(error))
    }
}

/// A convenient Result type for tail operations.
pub type Result<T> = std::result::Result<T, Error>;
