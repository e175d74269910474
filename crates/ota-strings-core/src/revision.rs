//! Last-value-wins revision broadcast.

use tokio::sync::watch;

/// Holds the current revision and notifies subscribers when it is published.
///
/// Backed by a `watch` channel: subscribers always see the latest value and
/// rapid successive publications may coalesce into one notification.
#[derive(Debug)]
pub struct RevisionPublisher {
    tx: watch::Sender<i64>,
}

impl RevisionPublisher {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self { tx }
    }

    /// Publish a revision; subscribers are notified even when it is unchanged.
    pub fn publish(&self, revision: i64) {
        self.tx.send_replace(revision);
    }

    pub fn current(&self) -> i64 {
        *self.tx.borrow()
    }

    /// Receiver starting from the current value, which counts as already seen.
    pub fn subscribe(&self) -> watch::Receiver<i64> {
        self.tx.subscribe()
    }
}

impl Default for RevisionPublisher {
    fn default() -> Self {
        Self::new()
    }
}
