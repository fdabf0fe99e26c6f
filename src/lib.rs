//! Follow a growing log file and receive each completed line as it is written.
//!
//! This behaves like `tail -f`: partial lines are held until their newline
//! arrives, and both common rotation schemes are handled. Truncation in place
//! (copytruncate) rewinds to the start of the file. Rename + recreate reopens
//! the new file at the same path.
//!
//! # Example
//!
//! ```rust,no_run
//! use log_tail::{Config, follow};
//! use tokio_stream::StreamExt;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cancel = CancellationToken::new();
//!     let mut tailer = follow(&cancel, "app.log", Config::default()).await?;
//!
//!     while let Some(line) = tailer.next().await {
//!         println!("{}: {}", line.observed_at(), line.text());
//!     }
//!
//!     if let Some(e) = tailer.err() {
//!         eprintln!("Error: {}", e);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Internal modules - not part of public API
mod config;
mod error;
mod identity;
mod line;
mod reader;
mod stream;
mod tail;
mod wait;
mod watcher;

#[cfg(test)]
mod test_helpers;

// Public API exports
pub use config::{Config, DEFAULT_BUFFER_SIZE, DEFAULT_POLL_INTERVAL};
pub use error::{Error, Result};
pub use line::Line;
pub use stream::Tailer;
pub use wait::WakeSignal;
pub use watcher::FileWatcher;

use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Starts following `path`, returning as soon as the file is open.
///
/// Tailing stops when `cancel` (or the returned handle's own token) is
/// cancelled, or on a fatal I/O error.
///
/// # Arguments
///
/// * `cancel` - Token that stops the tailer
/// * `path` - File path to follow
/// * `config` - Where to start, how often to poll, optional wake signal
///
/// # Example
///
/// ```rust,no_run
/// use log_tail::{Config, follow};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cancel = CancellationToken::new();
///     let config = Config::new().with_start_from_beginning(true);
///     let mut tailer = follow(&cancel, "app.log", config).await?;
///
///     while let Some(line) = tailer.recv().await {
///         println!("{}", line);
///     }
///
///     Ok(())
/// }
/// ```
pub async fn follow<P: AsRef<Path>>(
    cancel: &CancellationToken,
    path: P,
    config: Config,
) -> Result<Tailer> {
    Tailer::follow(cancel, path, config).await
}

/// Follows `path` and calls `on_line` for every line until the tailer stops.
///
/// Returns `Ok(())` when stopped by cancellation and the terminal error
/// otherwise.
///
/// ```rust,no_run
/// use log_tail::{Config, follow_each};
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cancel = CancellationToken::new();
///     follow_each(&cancel, "app.log", Config::default(), |line| {
///         println!("{}", line.text());
///     })
///     .await?;
///     Ok(())
/// }
/// ```
pub async fn follow_each<P, F>(
    cancel: &CancellationToken,
    path: P,
    config: Config,
    mut on_line: F,
) -> Result<()>
where
    P: AsRef<Path>,
    F: FnMut(Line),
{
    let mut tailer = follow(cancel, path, config).await?;
    while let Some(line) = tailer.recv().await {
        on_line(line);
    }
    match tailer.err() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
