//! Options for following a file.

use crate::wait::WakeSignal;
use std::time::Duration;

/// Interval between read attempts once the file is exhausted.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Capacity of the buffered reader wrapping the file.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

const MIN_BUFFER_SIZE: usize = 16;

/// How a file is followed.
///
/// ```
/// use log_tail::{Config, WakeSignal};
/// use std::time::Duration;
///
/// let wake = WakeSignal::new();
/// let config = Config::new()
///     .with_start_from_beginning(true)
///     .with_poll_interval(Duration::from_millis(250))
///     .with_wake(wake.clone());
///
/// assert!(config.start_from_beginning());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    start_from_beginning: bool,
    poll_interval: Duration,
    wake: Option<WakeSignal>,
    buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_from_beginning: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            wake: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the existing content first instead of starting at the end of the file.
    pub fn with_start_from_beginning(mut self, from_start: bool) -> Self {
        self.start_from_beginning = from_start;
        self
    }

    /// How long to wait before rereading an exhausted file. Still applies as
    /// a fallback ceiling when a wake signal is set.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Read as soon as `wake` fires instead of waiting out the poll interval.
    pub fn with_wake(mut self, wake: WakeSignal) -> Self {
        self.wake = Some(wake);
        self
    }

    /// Capacity of the read buffer in bytes. Values below 16 are raised to 16.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(MIN_BUFFER_SIZE);
        self
    }

    pub fn start_from_beginning(&self) -> bool {
        self.start_from_beginning
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn wake(&self) -> Option<&WakeSignal> {
        self.wake.as_ref()
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert!(!config.start_from_beginning());
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert!(config.wake().is_none());
        assert_eq!(config.buffer_size(), 4096);
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::new()
            .with_start_from_beginning(true)
            .with_poll_interval(Duration::from_secs(1))
            .with_wake(WakeSignal::new())
            .with_buffer_size(64 * 1024);

        assert!(config.start_from_beginning());
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert!(config.wake().is_some());
        assert_eq!(config.buffer_size(), 64 * 1024);
    }

    #[test]
    fn test_tiny_buffer_is_raised() {
        assert_eq!(Config::new().with_buffer_size(0).buffer_size(), 16);
        assert_eq!(Config::new().with_buffer_size(15).buffer_size(), 16);
        assert_eq!(Config::new().with_buffer_size(17).buffer_size(), 17);
    }
}
