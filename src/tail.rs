//! The tail loop: read, assemble, deliver, check for truncation or rotation, wait.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::line::{Assembled, Line, LineAssembler};
use crate::reader::{FileChange, ReadCursor};
use crate::wait::{WakeSignal, Wakeup, wait_for_data};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Capacity of the queue between the engine and its consumer.
pub(crate) const LINE_QUEUE_CAPACITY: usize = 64;

/// Terminal error of an engine, written once by the engine task.
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorSlot(Arc<Mutex<Option<Error>>>);

impl ErrorSlot {
    pub(crate) fn set(&self, error: Error) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    pub(crate) fn get(&self) -> Option<Error> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// State owned by the single task following one file.
pub(crate) struct Engine {
    cursor: ReadCursor,
    assembler: LineAssembler,
    chunk: Vec<u8>,
    lines: mpsc::Sender<Line>,
    cancel: CancellationToken,
    poll_interval: Duration,
    wake: Option<WakeSignal>,
}

impl Engine {
    pub(crate) fn new(
        cursor: ReadCursor,
        config: &Config,
        lines: mpsc::Sender<Line>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            cursor,
            assembler: LineAssembler::new(),
            chunk: Vec::with_capacity(config.buffer_size()),
            lines,
            cancel,
            poll_interval: config.poll_interval(),
            wake: config.wake().cloned(),
        }
    }

    /// Runs until cancelled, the consumer goes away, or a fatal I/O error.
    ///
    /// Returns `Ok(())` for the first two. The caller drops the engine
    /// afterwards, which closes the file and the line queue.
    pub(crate) async fn run(&mut self) -> Result<()> {
        debug!(identity = %self.cursor.identity(), "tail loop started");

        loop {
            if self.cancel.is_cancelled() {
                return Ok(());
            }

            self.chunk.clear();
            self.cursor.read_chunk(&mut self.chunk).await?;

            match self.assembler.feed(&self.chunk) {
                Assembled::Line(text) => {
                    if !self.deliver(Line::new(text)).await {
                        return Ok(());
                    }
                }
                Assembled::Blank => {}
                Assembled::Incomplete => {
                    self.on_exhausted().await?;
                    if wait_for_data(&self.cancel, self.poll_interval, self.wake.as_ref()).await
                        == Wakeup::Cancelled
                    {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Unterminated bytes never survive a truncation or a reopen.
    async fn on_exhausted(&mut self) -> Result<()> {
        match self.cursor.check_state().await? {
            FileChange::Unchanged => {}
            change @ (FileChange::Truncated | FileChange::Reopened) => {
                let dropped = self.assembler.discard();
                if dropped > 0 {
                    debug!(?change, dropped, "discarded partial line");
                }
            }
        }
        Ok(())
    }

    /// Hands a line to the consumer. False when the loop should stop instead.
    async fn deliver(&self, line: Line) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            sent = self.lines.send(line) => {
                if sent.is_err() {
                    debug!("line receiver dropped");
                }
                sent.is_ok()
            }
        }
    }
}
