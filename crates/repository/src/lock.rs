//! Per-aggregate mutual exclusion.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Guard for one aggregate instance. The aggregate stays locked until the
/// guard is dropped.
pub type AggregateLock = OwnedMutexGuard<()>;

/// Hands out one async mutex per aggregate identifier.
///
/// Holding the guard across `find_by_id`, the domain call and `save` turns
/// that sequence into a single critical section for the aggregate, which is
/// what keeps concurrent reservations against one store from overselling.
#[derive(Debug)]
pub struct LockRegistry<K> {
    locks: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K> Default for LockRegistry<K> {
    fn default() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> LockRegistry<K>
where
    K: Eq + Hash + Copy + Send,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the aggregate with the given id.
    pub async fn acquire(&self, key: K) -> AggregateLock {
        let mutex = {
            let mut locks = self.locks.lock().await;
            // Drop entries nobody is holding or waiting on.
            locks.retain(|_, m| Arc::strong_count(m) > 1);
            Arc::clone(locks.entry(key).or_default())
        };
        mutex.lock_owned().await
    }

    /// Returns the number of aggregates currently locked or awaited.
    pub async fn active_count(&self) -> usize {
        self.locks
            .lock()
            .await
            .values()
            .filter(|m| Arc::strong_count(m) > 1)
            .count()
    }
}
