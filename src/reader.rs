//! The open handle on the followed file, and truncation/rotation detection.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::identity::FileIdentity;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tracing::{debug, info, warn};

/// What the state check found after the file was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FileChange {
    /// Same file, no shrink; just wait for more bytes.
    Unchanged,
    /// The held file shrank below the read position and was rewound to zero.
    Truncated,
    /// The path now names a different file, which replaced the held handle.
    Reopened,
}

/// Owns the one open handle on the followed file.
///
/// The read position lives in the handle itself and is queried from it.
#[derive(Debug)]
pub(crate) struct ReadCursor {
    path: PathBuf,
    reader: BufReader<File>,
    identity: FileIdentity,
    buffer_size: usize,
}

impl ReadCursor {
    /// Opens `path`, moving to its end unless the config asks to start from the beginning.
    pub(crate) async fn open(path: &Path, config: &Config) -> Result<Self> {
        let open_error = |error: std::io::Error| Error::open(path, error);

        let mut file = File::open(path).await.map_err(open_error)?;
        if !config.start_from_beginning() {
            file.seek(SeekFrom::End(0)).await.map_err(open_error)?;
        }
        let metadata = file.metadata().await.map_err(open_error)?;

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::with_capacity(config.buffer_size(), file),
            identity: FileIdentity::from_metadata(&metadata),
            buffer_size: config.buffer_size(),
        })
    }

    /// Appends bytes up to and including the next `\n` to `chunk`.
    ///
    /// Stops early at end of file, leaving an unterminated tail in `chunk`.
    pub(crate) async fn read_chunk(&mut self, chunk: &mut Vec<u8>) -> Result<usize> {
        self.reader
            .read_until(b'\n', chunk)
            .await
            .map_err(Error::read)
    }

    pub(crate) async fn position(&mut self) -> Result<u64> {
        self.reader.stream_position().await.map_err(Error::seek)
    }

    pub(crate) fn identity(&self) -> FileIdentity {
        self.identity
    }

    /// Detects truncation of the held file, then replacement of the file at the path.
    pub(crate) async fn check_state(&mut self) -> Result<FileChange> {
        let position = self.position().await?;
        let size = self
            .reader
            .get_ref()
            .metadata()
            .await
            .map_err(Error::stat)?
            .len();

        if size < position {
            debug!(path = %self.path.display(), position, size, "file truncated, rewinding");
            self.reader
                .seek(SeekFrom::Start(0))
                .await
                .map_err(Error::seek)?;
            return Ok(FileChange::Truncated);
        }

        let candidate = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => FileIdentity::from_metadata(&metadata),
            Err(error) => {
                // Usually the gap between rename and create during rotation.
                debug!(path = %self.path.display(), %error, "path not resolvable, retrying");
                return Ok(FileChange::Unchanged);
            }
        };

        if !self.identity.is_replaced_by(&candidate) {
            return Ok(FileChange::Unchanged);
        }

        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(error) => {
                warn!(path = %self.path.display(), %error, "rotated file not openable yet, retrying");
                return Ok(FileChange::Unchanged);
            }
        };
        let identity = FileIdentity::from_metadata(&file.metadata().await.map_err(Error::stat)?);

        info!(
            path = %self.path.display(),
            previous = %self.identity,
            current = %identity,
            "file rotated, reopened"
        );
        self.reader = BufReader::with_capacity(self.buffer_size, file);
        self.identity = identity;
        Ok(FileChange::Reopened)
    }
}
