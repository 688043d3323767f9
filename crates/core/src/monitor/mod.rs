//! Transfer-monitoring polling loop.
//!
//! Two states: Idle (no watcher) and Polling (a transfers view is open).
//! While polling, a background task fetches the cloud task list on a fixed
//! interval and replaces the whole snapshot. Stopping tears the task down
//! deterministically; no timer outlives its view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::cloud::{CloudClient, CloudTask};

/// Default interval between task list polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Polls the cloud task list while a transfers view is open.
pub struct TransferMonitor {
    cloud: Arc<dyn CloudClient>,
    poll_interval: Duration,
    running: Arc<AtomicBool>,
    tasks: Arc<RwLock<Vec<CloudTask>>>,
    shutdown_tx: broadcast::Sender<()>,
}

impl TransferMonitor {
    /// Create a monitor in the Idle state.
    pub fn new(cloud: Arc<dyn CloudClient>, poll_interval: Duration) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            cloud,
            poll_interval,
            running: Arc::new(AtomicBool::new(false)),
            tasks: Arc::new(RwLock::new(Vec::new())),
            shutdown_tx,
        }
    }

    /// Idle -> Polling: spawn the poll task. Idempotent.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            debug!("Transfer monitor already polling");
            return;
        }

        info!("Transfer monitor started");

        let cloud = Arc::clone(&self.cloud);
        let running = Arc::clone(&self.running);
        let tasks = Arc::clone(&self.tasks);
        let poll_interval = self.poll_interval;
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            // First snapshot immediately so an opened view isn't empty for
            // a whole interval.
            Self::poll_once(&cloud, &tasks).await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                    _ = tokio::time::sleep(poll_interval) => {
                        if !running.load(Ordering::Relaxed) {
                            break;
                        }
                        Self::poll_once(&cloud, &tasks).await;
                    }
                }
            }
            debug!("Transfer monitor poll task stopped");
        });
    }

    /// Polling -> Idle: cancel the poll task. Idempotent.
    pub fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            debug!("Transfer monitor not polling");
            return;
        }

        let _ = self.shutdown_tx.send(());
        info!("Transfer monitor stopped");
    }

    /// Whether the monitor is currently polling.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Latest task snapshot.
    pub async fn snapshot(&self) -> Vec<CloudTask> {
        self.tasks.read().await.clone()
    }

    /// One poll tick: replace the whole snapshot, or keep the previous one
    /// on failure. The next tick retries implicitly; there is no backoff.
    async fn poll_once(cloud: &Arc<dyn CloudClient>, tasks: &Arc<RwLock<Vec<CloudTask>>>) {
        match cloud.get_tasks().await {
            Ok(latest) => {
                let mut snapshot = tasks.write().await;
                *snapshot = latest;
            }
            Err(e) => {
                warn!(error = %e, "Task poll failed, keeping previous snapshot");
            }
        }
    }
}
