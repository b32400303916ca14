use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async lock per key.
///
/// The first caller for a key takes the lock and does the work; later callers
/// queue on the same lock and re-check the cache once it is released. A
/// holder that is dropped mid-flight simply releases the lock, so the next
/// waiter takes over. The entry for a key is removed when its last holder
/// releases it with nobody queued.
pub(crate) struct KeyedLocks<K> {
    inflight: StdMutex<HashMap<K, Arc<Mutex<()>>>>,
}

/// Held while a key's work is in flight.
pub(crate) struct KeyGuard<'a, K>
where
    K: Eq + Hash,
{
    locks: &'a KeyedLocks<K>,
    key: K,
    guard: Option<OwnedMutexGuard<()>>,
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new() -> Self {
        Self {
            inflight: StdMutex::new(HashMap::new()),
        }
    }

    pub(crate) async fn acquire(&self, key: &K) -> KeyGuard<'_, K> {
        let lock = Arc::clone(
            self.map()
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        );
        let guard = lock.lock_owned().await;
        KeyGuard {
            locks: self,
            key: key.clone(),
            guard: Some(guard),
        }
    }

    /// Keys with a holder or a queued waiter.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.map().len()
    }

    // Never held across an await, so a blocking mutex is fine.
    fn map(&self) -> MutexGuard<'_, HashMap<K, Arc<Mutex<()>>>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K> Drop for KeyGuard<'_, K>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut inflight = self
            .locks
            .inflight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Waiters clone the Arc under this same lock, so a count of one means
        // only the map still refers to it.
        if inflight
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            inflight.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_key_serializes() {
        let locks = KeyedLocks::new();
        let guard = locks.acquire(&"a").await;
        let second = tokio::time::timeout(Duration::from_millis(20), locks.acquire(&"a")).await;
        assert!(second.is_err(), "second acquire should wait for the first");
        drop(guard);
        let _second = locks.acquire(&"a").await;
    }

    #[tokio::test]
    async fn different_keys_do_not_block() {
        let locks = KeyedLocks::new();
        let _a = locks.acquire(&"a").await;
        let b = tokio::time::timeout(Duration::from_millis(20), locks.acquire(&"b")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn released_keys_are_pruned() {
        let locks = KeyedLocks::new();
        let a = locks.acquire(&"a").await;
        let b = locks.acquire(&"b").await;
        assert_eq!(locks.len(), 2);

        drop(a);
        assert_eq!(locks.len(), 1);
        drop(b);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn entry_survives_while_a_waiter_is_queued() {
        let locks = Arc::new(KeyedLocks::new());
        let first = locks.acquire(&"a").await;

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire(&"a").await;
                locks.len()
            })
        };
        // Let the waiter queue on the lock.
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(waiter.await.expect("waiter task"), 1);
        assert_eq!(locks.len(), 0);
    }
}
