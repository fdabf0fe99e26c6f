//! Lines emitted by the tailer and the assembler that builds them from raw reads.

use chrono::{DateTime, Utc};
use std::fmt;

/// A single line read from the followed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String,
    observed_at: DateTime<Utc>,
}

impl Line {
    pub(crate) fn new(text: String) -> Self {
        Self {
            text,
            observed_at: Utc::now(),
        }
    }

    /// Line content with trailing `\r` / `\n` characters stripped.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// When the tailer read the line.
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Outcome of feeding one read into the [`LineAssembler`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Assembled {
    /// A terminator completed a non-empty line.
    Line(String),
    /// A terminator completed a line with no content; nothing to emit.
    Blank,
    /// No terminator yet; the bytes are held as a partial line.
    Incomplete,
}

/// Accumulates bytes written since the last terminator.
#[derive(Debug, Default)]
pub(crate) struct LineAssembler {
    pending: Vec<u8>,
}

impl LineAssembler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Folds one read into the pending line.
    ///
    /// A read holds at most one `\n`, as its last byte, which is what a
    /// `read_until(b'\n')` produces.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> Assembled {
        self.pending.extend_from_slice(chunk);
        if !chunk.ends_with(b"\n") {
            return Assembled::Incomplete;
        }

        let raw = std::mem::take(&mut self.pending);
        let text = strip_line_ending(&raw);
        if text.is_empty() {
            Assembled::Blank
        } else {
            Assembled::Line(String::from_utf8_lossy(text).into_owned())
        }
    }

    /// Drops any unterminated bytes, returning how many were dropped.
    pub(crate) fn discard(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// Strips every trailing `\r` and `\n`.
fn strip_line_ending(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| *b != b'\n' && *b != b'\r')
        .map_or(0, |last| last + 1);
    &bytes[..end]
}
