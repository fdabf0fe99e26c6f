//! File identity used to tell "same file, still growing" from "a different
//! file now lives at this path".
//!
//! On Unix this is the device ID + inode number. Elsewhere no stable
//! equivalent is read and every identity is [`FileIdentity::UNKNOWN`], which
//! turns rotation detection off and leaves only truncation detection.

use std::fmt;
use std::fs::Metadata;

/// Device + inode pair identifying the file behind an open handle or path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct FileIdentity {
    dev: u64,
    ino: u64,
}

impl FileIdentity {
    /// Sentinel for "identity not available on this platform".
    pub(crate) const UNKNOWN: FileIdentity = FileIdentity { dev: 0, ino: 0 };

    #[cfg(test)]
    pub(crate) fn new(dev: u64, ino: u64) -> Self {
        Self { dev, ino }
    }

    /// Resolve the identity from file metadata.
    #[cfg(unix)]
    pub(crate) fn from_metadata(metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        }
    }

    /// Resolve the identity from file metadata.
    ///
    /// Always [`FileIdentity::UNKNOWN`] on this platform.
    #[cfg(not(unix))]
    pub(crate) fn from_metadata(_metadata: &Metadata) -> Self {
        Self::UNKNOWN
    }

    pub(crate) fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }

    /// Whether `candidate` names a different file than `self`.
    ///
    /// An unknown identity on either side is never comparable, so it never
    /// counts as a replacement.
    pub(crate) fn is_replaced_by(&self, candidate: &FileIdentity) -> bool {
        !self.is_unknown() && !candidate.is_unknown() && self != candidate
    }
}

impl fmt::Display for FileIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unknown() {
            write!(f, "unknown")
        } else {
            write!(f, "{}:{}", self.dev, self.ino)
        }
    }
}
