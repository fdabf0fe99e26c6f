//! Suspension between read attempts once the file is exhausted.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// An external "the file may have new data" signal.
///
/// Clone it, hand one copy to [`Config::with_wake`](crate::Config::with_wake)
/// and call [`WakeSignal::wake`] from whatever observes the file. A wake sent
/// while the tailer is busy reading is remembered for its next wait; repeated
/// wakes before then collapse into one.
#[derive(Debug, Clone, Default)]
pub struct WakeSignal {
    notify: Arc<Notify>,
}

impl WakeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wake(&self) {
        self.notify.notify_one();
    }

    async fn woken(&self) {
        self.notify.notified().await;
    }
}

/// Why a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wakeup {
    Signalled,
    Elapsed,
    Cancelled,
}

/// Blocks until `wake` fires, `poll_interval` elapses, or `cancel` is triggered.
///
/// The poll interval stays in force when a wake signal is configured so a
/// missed signal only costs latency.
pub(crate) async fn wait_for_data(
    cancel: &CancellationToken,
    poll_interval: Duration,
    wake: Option<&WakeSignal>,
) -> Wakeup {
    let signalled = async {
        match wake {
            Some(signal) => signal.woken().await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Wakeup::Cancelled,
        _ = signalled => Wakeup::Signalled,
        _ = tokio::time::sleep(poll_interval) => Wakeup::Elapsed,
    }
}
