// src/filesystem/batcher.rs
//!
//! Change Batcher
//!
//! Coalesces bursts of watcher notifications (git checkouts, build output) into one
//! deduplicated delivery per quiet window. The pending map lives inside the batcher
//! task; producers only ever hold a channel sender, so enqueueing never blocks.
//!

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::filesystem::host::HostFs;
use crate::filesystem::path::to_native;
use crate::filesystem::types::WatchEvent;

/// Receives every [`WatchEvent`] the facade produces
pub type ChangeCallback = Arc<dyn Fn(WatchEvent) + Send + Sync>;

#[derive(Debug)]
struct PendingChange {
    path: String,
    needs_stats: bool,
}

/// Cloneable producer side of a [`ChangeBatcher`], safe to use from watcher threads
#[derive(Debug, Clone)]
pub struct ChangeQueue {
    tx: mpsc::UnboundedSender<PendingChange>,
}

impl ChangeQueue {
    /// Record that `path` changed. Returns false once the batcher has stopped.
    pub fn enqueue(&self, path: impl Into<String>, needs_stats: bool) -> bool {
        self.tx
            .send(PendingChange {
                path: path.into(),
                needs_stats,
            })
            .is_ok()
    }
}

pub struct ChangeBatcher {
    queue: ChangeQueue,
    task: JoinHandle<()>,
}

impl ChangeBatcher {
    /// Start the batcher task on the current tokio runtime
    pub fn spawn(window: Duration, host: Arc<dyn HostFs>, callback: ChangeCallback) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_batcher(rx, window, host, callback));

        Self {
            queue: ChangeQueue { tx },
            task,
        }
    }

    pub fn enqueue(&self, path: impl Into<String>, needs_stats: bool) -> bool {
        self.queue.enqueue(path, needs_stats)
    }

    pub fn queue(&self) -> ChangeQueue {
        self.queue.clone()
    }

    /// Stop accepting changes, flush whatever is pending and wait for delivery.
    ///
    /// Clones handed out by [`ChangeBatcher::queue`] keep the task alive until dropped.
    pub async fn shutdown(self) {
        drop(self.queue);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "change batcher task failed");
        }
    }
}

/// A path that ever needed stats within the window keeps needing them
fn merge(pending: &mut HashMap<String, bool>, change: PendingChange) {
    *pending.entry(change.path).or_insert(false) |= change.needs_stats;
}

async fn run_batcher(
    mut rx: mpsc::UnboundedReceiver<PendingChange>,
    window: Duration,
    host: Arc<dyn HostFs>,
    callback: ChangeCallback,
) {
    let mut pending: HashMap<String, bool> = HashMap::new();
    let mut closed = false;

    while !closed {
        // Idle until the first change after the last flush
        let Some(first) = rx.recv().await else {
            break;
        };
        merge(&mut pending, first);

        // The window starts with the first change and is not extended by later ones
        let deadline = tokio::time::sleep(window);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut deadline => break,
                change = rx.recv() => match change {
                    Some(change) => merge(&mut pending, change),
                    None => {
                        closed = true;
                        break;
                    }
                },
            }
        }

        // Cleared before delivery: anything arriving from here on opens a new window
        let batch = std::mem::take(&mut pending);
        deliver(batch, host.as_ref(), &callback).await;
    }

    tracing::debug!("change batcher stopped");
}

async fn deliver(batch: HashMap<String, bool>, host: &dyn HostFs, callback: &ChangeCallback) {
    tracing::trace!(changes = batch.len(), "flushing change batch");

    let events = join_all(batch.into_iter().map(|(path, needs_stats)| async move {
        if !needs_stats {
            return WatchEvent::Changed { path, stat: None };
        }

        match host.stat(&to_native(&path)).await {
            Ok(stat) => WatchEvent::Changed {
                path,
                stat: Some(stat.into_record()),
            },
            Err(e) => {
                tracing::warn!(%path, error = %e, "stat failed for batched change, delivering without stats");
                WatchEvent::Changed { path, stat: None }
            }
        }
    }))
    .await;

    for event in events {
        callback(event);
    }
}
