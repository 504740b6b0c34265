/**
 * Keyed Locks
 *
 * A table of async mutexes created on demand per key. The room resolver
 * locks per pair while creating a room, the gateway locks per room while
 * appending and emitting a message.
 *
 * Every caller holds a lease on its key from the moment it asks for the
 * lock until its guard is dropped. The lease is released in `Drop`, so a
 * caller cancelled while waiting or while holding the lock still gives its
 * slot back; a key leaves the table when its last lease goes.
 */

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

struct Slot {
    lock: Arc<Mutex<()>>,
    leases: usize,
}

type Slots<K> = Arc<StdMutex<HashMap<K, Slot>>>;

/// On-demand async mutex per key
pub struct KeyedLocks<K> {
    slots: Slots<K>,
}

impl<K> Clone for KeyedLocks<K> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            slots: Arc::new(StdMutex::new(HashMap::new())),
        }
    }
}

impl<K: Eq + Hash + Clone> KeyedLocks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn lock(&self, key: K) -> KeyedGuard<K> {
        let (lease, lock) = self.lease(key);
        // Cancellation here drops `lease`, which returns the slot
        let guard = lock.lock_owned().await;
        KeyedGuard {
            _guard: guard,
            _lease: lease,
        }
    }

    /// Number of keys currently held or waited on
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lease(&self, key: K) -> (Lease<K>, Arc<Mutex<()>>) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = slots.entry(key.clone()).or_insert_with(|| Slot {
            lock: Arc::new(Mutex::new(())),
            leases: 0,
        });
        slot.leases += 1;
        let lock = slot.lock.clone();
        let lease = Lease {
            key,
            slots: self.slots.clone(),
        };
        (lease, lock)
    }
}

struct Lease<K: Eq + Hash> {
    key: K,
    slots: Slots<K>,
}

impl<K: Eq + Hash> Drop for Lease<K> {
    fn drop(&mut self) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get_mut(&self.key) {
            slot.leases -= 1;
            if slot.leases == 0 {
                slots.remove(&self.key);
            }
        }
    }
}

/// Exclusive access to one key; released on drop
pub struct KeyedGuard<K: Eq + Hash> {
    // Field order matters: the mutex unlocks before the lease is returned
    _guard: OwnedMutexGuard<()>,
    _lease: Lease<K>,
}
