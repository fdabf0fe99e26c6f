//! Handle to a running tailer: its lines, its terminal error, and its completion.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::line::Line;
use crate::reader::ReadCursor;
use crate::tail::{Engine, ErrorSlot, LINE_QUEUE_CAPACITY};
use futures::Stream;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A file being followed by a background task.
///
/// Lines arrive through [`Tailer::recv`] or the [`Stream`] impl. Once they
/// stop, [`Tailer::err`] tells a cancelled tailer (`None`) from a failed one.
/// Dropping the handle stops the background task.
pub struct Tailer {
    lines: mpsc::Receiver<Line>,
    error: ErrorSlot,
    done: watch::Receiver<bool>,
    shutdown: CancellationToken,
    path: PathBuf,
}

impl Tailer {
    /// Opens `path` and starts following it on a new task.
    ///
    /// Returns once the file is open and positioned. An open failure is
    /// returned here and no task is started.
    pub async fn follow<P: AsRef<Path>>(
        cancel: &CancellationToken,
        path: P,
        config: Config,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cursor = ReadCursor::open(&path, &config).await?;

        let (tx, rx) = mpsc::channel(LINE_QUEUE_CAPACITY);
        let (done_tx, done_rx) = watch::channel(false);
        let shutdown = cancel.child_token();
        let error = ErrorSlot::default();

        let mut engine = Engine::new(cursor, &config, tx, shutdown.clone());
        let task_error = error.clone();
        let task_path = path.clone();

        tokio::spawn(async move {
            if let Err(e) = engine.run().await {
                warn!(path = %task_path.display(), error = %e, "tailer stopped");
                task_error.set(e);
            }
            // Closes the file and the line queue before signalling completion.
            drop(engine);
            debug!(path = %task_path.display(), "tailer finished");
            let _ = done_tx.send(true);
        });

        debug!(
            path = %path.display(),
            from_start = config.start_from_beginning(),
            poll_interval = ?config.poll_interval(),
            "following file"
        );

        Ok(Self {
            lines: rx,
            error,
            done: done_rx,
            shutdown,
            path,
        })
    }

    /// Next line, or `None` once the tailer has stopped and every queued line was taken.
    pub async fn recv(&mut self) -> Option<Line> {
        self.lines.recv().await
    }

    /// Why the tailer stopped. `None` while running and after cancellation.
    pub fn err(&self) -> Option<Error> {
        self.error.get()
    }

    /// Waits until the task has exited and released the file.
    pub async fn done(&self) {
        let mut done = self.done.clone();
        // An Err means the task is gone without reporting, which is also done.
        let _ = done.wait_for(|finished| *finished).await;
    }

    pub fn is_done(&self) -> bool {
        *self.done.borrow()
    }

    /// Stops this tailer without touching the token it was created with.
    pub fn stop(&self) {
        self.shutdown.cancel();
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for Tailer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl Stream for Tailer {
    type Item = Line;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.lines.poll_recv(cx)
    }
}
