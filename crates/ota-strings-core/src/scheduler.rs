//! Periodic sync scheduler.
//!
//! Runs a sync cycle every `interval` until stopped. Stopping takes effect
//! before the next tick; a cycle already running is allowed to finish.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::controller::SyncController;

/// Handle to a running periodic sync task. Dropping it stops the task.
pub struct PeriodicSync {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PeriodicSync {
    pub fn start(controller: Arc<SyncController>, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            tracing::debug!(interval_secs = interval.as_secs_f64(), "Periodic sync started");
            loop {
                tokio::select! {
                    () = tokio::time::sleep(interval) => {}
                    _ = shutdown_rx.changed() => break,
                }

                if *shutdown_rx.borrow() || controller.is_shut_down() {
                    break;
                }

                let result = controller.check_for_updates().await;
                tracing::debug!(?result, "Periodic sync finished");
            }
            tracing::debug!("Periodic sync stopped");
        });

        Self { shutdown_tx, handle }
    }

    /// Signal the task to stop before its next tick.
    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PeriodicSync {
    fn drop(&mut self) {
        self.stop();
    }
}
