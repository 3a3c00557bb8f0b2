//! Outbound persistence queue for classification changes.
//!
//! Classification is optimistic: the in-memory store updates immediately
//! and the sidecar write happens behind this queue. A single worker drains
//! batches in arrival order and coalesces rapid re-classifications of the
//! same photo, so only the latest state gets written and per-photo write
//! order can never invert. The pending counter feeds the status bar's
//! unsynced marker; write failures come back as messages the app polls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::cull::DecisionChange;
use crate::sidecar;

pub struct SyncQueue {
    tx: mpsc::UnboundedSender<Vec<DecisionChange>>,
    pending: Arc<AtomicUsize>,
    failures_rx: std_mpsc::Receiver<String>,
}

impl SyncQueue {
    /// Spawn the sync worker on the current tokio runtime.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (failures_tx, failures_rx) = std_mpsc::channel();
        let pending = Arc::new(AtomicUsize::new(0));

        tokio::spawn(run_worker(rx, Arc::clone(&pending), failures_tx));

        Self {
            tx,
            pending,
            failures_rx,
        }
    }

    /// Queue a batch of changes for persistence.
    pub fn enqueue(&self, changes: Vec<DecisionChange>) {
        if changes.is_empty() {
            return;
        }
        let count = changes.len();
        self.pending.fetch_add(count, Ordering::SeqCst);
        if self.tx.send(changes).is_err() {
            self.pending.fetch_sub(count, Ordering::SeqCst);
            tracing::warn!("Sync worker is gone, dropped {count} change(s)");
        }
    }

    /// Number of changes not yet flushed to disk.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Drain failure messages produced since the last poll.
    pub fn poll_failures(&self) -> Vec<String> {
        let mut failures = Vec::new();
        while let Ok(msg) = self.failures_rx.try_recv() {
            failures.push(msg);
        }
        failures
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<Vec<DecisionChange>>,
    pending: Arc<AtomicUsize>,
    failures: std_mpsc::Sender<String>,
) {
    while let Some(batch) = rx.recv().await {
        // Absorb everything queued right now; last write per photo wins.
        let mut latest: Vec<DecisionChange> = Vec::new();
        absorb(&mut latest, batch, &pending);
        while let Ok(batch) = rx.try_recv() {
            absorb(&mut latest, batch, &pending);
        }

        for change in latest {
            let meta = sidecar::meta_path(&change.preview_path);
            if let Err(e) = sidecar::write_meta_if_changed(&meta, change.state).await {
                tracing::error!(
                    path = %change.preview_path.display(),
                    error = %e,
                    "Failed to sync cull state"
                );
                let name = change
                    .preview_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| change.preview_path.display().to_string());
                let _ = failures.send(format!("Failed to sync {name}: {e}"));
            }
            pending.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

/// Merge a batch into the coalesced set: new photos keep arrival order,
/// superseded writes are retired on the spot.
fn absorb(latest: &mut Vec<DecisionChange>, batch: Vec<DecisionChange>, pending: &AtomicUsize) {
    for change in batch {
        match latest
            .iter()
            .position(|c| c.preview_path == change.preview_path)
        {
            Some(i) => {
                latest[i].state = change.state;
                pending.fetch_sub(1, Ordering::SeqCst);
            }
            None => latest.push(change),
        }
    }
}
