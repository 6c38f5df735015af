use std::{collections::HashSet, sync::Arc};

use parking_lot::Mutex;
use tokio::sync::watch;

/// Tracks whether every shard run by this process has received its `Ready` event.
///
/// Cloned into the event handler, which marks shards ready, and into background tasks
/// that need to wait for the gateway before continuing.
#[derive(Clone)]
pub struct ReadySignal {
    expected: usize,
    ready_shards: Arc<Mutex<HashSet<u32>>>,
    tx: Arc<watch::Sender<bool>>,
}

impl ReadySignal {
    /// Creates a signal that fires once `expected` distinct shards are ready.
    pub fn new(expected: u32) -> Self {
        let (tx, _) = watch::channel(false);

        Self {
            expected: expected.max(1) as usize,
            ready_shards: Arc::new(Mutex::new(HashSet::new())),
            tx: Arc::new(tx),
        }
    }

    /// Records that a shard is ready. Repeated `Ready` events from a reconnecting shard are
    /// counted once.
    ///
    /// # Returns
    /// - `true` if this call made the whole process ready
    pub fn mark_ready(&self, shard_id: u32) -> bool {
        let all_ready = {
            let mut shards = self.ready_shards.lock();
            shards.insert(shard_id);
            shards.len() >= self.expected
        };

        all_ready
            && self.tx.send_if_modified(|ready| {
                let changed = !*ready;
                *ready = true;
                changed
            })
    }

    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Waits until every shard is ready. Returns immediately if they already are.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel can't close while we wait.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}
