//! Per-triple async mutexes.
//!
//! Each [`LockKey`] gets its own `tokio::sync::Mutex`, created on demand and
//! dropped from the map once nobody holds or awaits it. The map's shard lock
//! is only taken for the lookup, never across an `.await`.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::locking::LockKey;

type Slots = DashMap<LockKey, Arc<Mutex<()>>>;

#[derive(Default)]
pub(crate) struct TripleGuards {
    slots: Arc<Slots>,
}

impl TripleGuards {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub(crate) async fn lock(&self, key: &LockKey) -> TripleGuard {
        let slot = self
            .slots
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        // Built before waiting so that a caller dropped mid-wait still prunes
        // the slot on its way out.
        let mut pending = TripleGuard {
            guard: None,
            key: key.clone(),
            slots: Arc::clone(&self.slots),
        };
        pending.guard = Some(slot.lock_owned().await);
        pending
    }

    /// Number of keys currently tracked.
    #[cfg(test)]
    pub(crate) fn tracked(&self) -> usize {
        self.slots.len()
    }
}

/// Held (or awaited) access to one triple. Dropping it releases the mutex
/// and prunes the slot if no other task is waiting on it.
pub(crate) struct TripleGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: LockKey,
    slots: Arc<Slots>,
}

impl Drop for TripleGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map itself still references the mutex.
        self.slots
            .remove_if(&self.key, |_, slot| Arc::strong_count(slot) == 1);
    }
}
