//! Per-owner critical sections.
//!
//! Expense admission reads the spent total and then inserts. Two concurrent
//! admissions for the same owner must not both pass the check, so the whole
//! read-compute-write runs under the owner's guard. Different owners never
//! contend.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::Identity;

/// Entries are pruned once the map grows past this many owners.
const PRUNE_THRESHOLD: usize = 256;

#[derive(Debug, Default)]
pub(crate) struct OwnerLocks {
    inner: Mutex<HashMap<Identity, Arc<Mutex<()>>>>,
}

impl OwnerLocks {
    /// Waits for exclusive access to `owner`'s section.
    ///
    /// The section ends when the returned guard is dropped, including when
    /// the holding future is cancelled.
    pub(crate) async fn acquire(&self, owner: &Identity) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            if map.len() >= PRUNE_THRESHOLD {
                // Only the map holds idle locks.
                map.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            map.entry(owner.clone()).or_default().clone()
        };

        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}
