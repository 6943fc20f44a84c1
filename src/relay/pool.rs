//! Round-robin relay rotation.

use parking_lot::Mutex;
use reelcast_common::Relay;
use std::sync::Arc;

/// Thread-safe round-robin pool of relays.
///
/// The relay list is fixed at construction; only the cursor moves. Cloning
/// the pool shares the cursor.
#[derive(Clone, Default)]
pub struct RelayPool {
    inner: Arc<PoolInner>,
}

#[derive(Default)]
struct PoolInner {
    relays: Vec<Relay>,
    cursor: Mutex<usize>,
}

impl RelayPool {
    /// Create a pool that rotates through `relays` in order.
    pub fn new(relays: Vec<Relay>) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                relays,
                cursor: Mutex::new(0),
            }),
        }
    }

    /// Create a pool with no relays; every acquisition goes direct.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Return the relay under the cursor and advance it.
    ///
    /// Returns `None` when the pool is empty.
    pub fn next(&self) -> Option<Relay> {
        let relays = &self.inner.relays;
        if relays.is_empty() {
            return None;
        }

        let mut cursor = self.inner.cursor.lock();
        let relay = relays[*cursor];
        *cursor = (*cursor + 1) % relays.len();
        Some(relay)
    }

    /// Number of relays in the pool.
    pub fn len(&self) -> usize {
        self.inner.relays.len()
    }

    /// Check if the pool has no relays.
    pub fn is_empty(&self) -> bool {
        self.inner.relays.is_empty()
    }
}

impl std::fmt::Debug for RelayPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayPool")
            .field("relays", &self.inner.relays.len())
            .field("cursor", &*self.inner.cursor.lock())
            .finish()
    }
}
