//! In-memory lock store.
//!
//! Dumb CRUD over a map from target id to the ordered list of active locks
//! on that target. No conflict rules live here — duplicate detection and
//! level checks are [`LockingService`](crate::locking::LockingService)'s
//! job. The whole map (including list mutation) sits behind one `RwLock`;
//! individual calls are consistent, but the store gives no atomicity across
//! a check-then-act pair — callers needing that must serialize externally.

use std::collections::HashMap;

use tokio::sync::RwLock;

use leda_core::error::require_non_empty;
use leda_core::{is_same_lock, CoreError, LockData};

/// Concurrent store mapping a lock target id to its active locks.
///
/// Designed to be wrapped in `Arc` and shared across the application.
pub struct LockStore {
    locks: RwLock<HashMap<String, Vec<LockData>>>,
}

impl LockStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            locks: RwLock::new(HashMap::new()),
        }
    }

    /// Append a lock to its target's list, creating the list if absent.
    ///
    /// Returns the stored lock. The `Option` leaves room for a backing
    /// store that can refuse an append; the vec-backed store never does.
    pub async fn store(&self, lock: LockData) -> Option<LockData> {
        let mut locks = self.locks.write().await;
        locks
            .entry(lock.lock_id.clone())
            .or_default()
            .push(lock.clone());
        Some(lock)
    }

    /// Remove every stored lock the probe designates (see
    /// [`is_same_lock`]); returns the last removed entry, or `None` when
    /// nothing matched or the target is unknown.
    ///
    /// Once a target's list becomes empty its map entry is deleted, so an
    /// unlocked document leaves no residue behind.
    pub async fn remove(&self, probe: &LockData) -> Option<LockData> {
        let mut locks = self.locks.write().await;
        let list = locks.get_mut(&probe.lock_id)?;

        let mut removed = None;
        list.retain(|stored| {
            if is_same_lock(probe, stored) {
                removed = Some(stored.clone());
                false
            } else {
                true
            }
        });

        if list.is_empty() {
            locks.remove(&probe.lock_id);
        }
        removed
    }

    /// Snapshot of the locks for one target; empty for an unknown target.
    pub async fn current_locks(&self, lock_id: &str) -> Result<Vec<LockData>, CoreError> {
        require_non_empty("lock_id", lock_id)?;
        let locks = self.locks.read().await;
        Ok(locks.get(lock_id).cloned().unwrap_or_default())
    }

    /// Flattened snapshot of the locks across all targets.
    pub async fn all_locks(&self) -> Vec<LockData> {
        let locks = self.locks.read().await;
        locks.values().flatten().cloned().collect()
    }
}

impl Default for LockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leda_core::LockLevel;

    fn lock(target: &str, user: &str, session: Option<&str>) -> LockData {
        LockData {
            lock_id: target.into(),
            user_login_name: user.into(),
            user_name: None,
            session_id: session.map(String::from),
            element_id: None,
            lock_level: LockLevel::DocumentLock,
            locking_acquired_on: 0,
        }
    }

    #[tokio::test]
    async fn test_store_then_snapshot() {
        let store = LockStore::new();
        store.store(lock("doc-1", "jane", None)).await;

        let current = store.current_locks("doc-1").await.unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].user_login_name, "jane");
    }

    #[tokio::test]
    async fn test_current_locks_rejects_empty_id() {
        let store = LockStore::new();
        assert!(store.current_locks("").await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_target_yields_empty_snapshot() {
        let store = LockStore::new();
        assert!(store.current_locks("doc-9").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_deletes_all_matches_and_returns_last() {
        let store = LockStore::new();
        // Two locks matching a sessionless probe (same user and level).
        store.store(lock("doc-1", "jane", Some("s1"))).await;
        store.store(lock("doc-1", "jane", Some("s2"))).await;

        let removed = store.remove(&lock("doc-1", "jane", None)).await;
        assert_eq!(removed.unwrap().session_id.as_deref(), Some("s2"));
        assert!(store.current_locks("doc-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_target_entry_is_garbage_collected() {
        let store = LockStore::new();
        store.store(lock("doc-1", "jane", None)).await;
        store.remove(&lock("doc-1", "jane", None)).await;

        assert!(store.all_locks().await.is_empty());

        // A later store on the same id starts a fresh list.
        store.store(lock("doc-1", "john", None)).await;
        let current = store.current_locks("doc-1").await.unwrap();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].user_login_name, "john");
    }

    #[tokio::test]
    async fn test_remove_on_unknown_target_is_none() {
        let store = LockStore::new();
        assert!(store.remove(&lock("doc-1", "jane", None)).await.is_none());
    }
}
