//! Locking policy layer.
//!
//! Enforces the conflict rules between lock levels on top of the dumb
//! [`LockStore`]:
//!
//! - a request equal to an already-stored lock (same target, owner, level,
//!   element, compatible session) is denied — the single-acquisition
//!   invariant;
//! - a `DOCUMENT_LOCK` is denied while any other user holds a document or
//!   element lock on the target;
//! - an `ELEMENT_LOCK` is denied while another user holds a document lock,
//!   or an element lock on the same element;
//! - a `READ_LOCK` always coexists with other locks.
//!
//! Denial is a `success = false` [`LockActionInfo`], never an error; the
//! denied caller gets the current holders in the snapshot so the UI can
//! show who has the document.

use tokio::sync::Mutex;

use leda_core::error::require_non_empty;
use leda_core::types::now_millis;
use leda_core::{is_same_lock, CoreError, LockActionInfo, LockData, LockLevel, LockOperation};

use crate::lock_store::LockStore;

/// Policy service wrapping the lock store.
///
/// Every check-then-act sequence runs under `mutation`, so two concurrent
/// acquisitions for conflicting levels on one target cannot both succeed.
/// The store's own lock only makes individual calls consistent.
pub struct LockingService {
    store: LockStore,
    mutation: Mutex<()>,
}

impl LockingService {
    pub fn new() -> Self {
        Self {
            store: LockStore::new(),
            mutation: Mutex::new(()),
        }
    }

    // -----------------------------------------------------------------------
    // Acquisition
    // -----------------------------------------------------------------------

    /// Acquire a document-level lock.
    pub async fn lock_document(
        &self,
        lock_id: &str,
        user_login_name: &str,
        user_name: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<LockActionInfo, CoreError> {
        require_non_empty("lock_id", lock_id)?;
        require_non_empty("user_login_name", user_login_name)?;
        self.acquire(candidate(
            lock_id,
            user_login_name,
            user_name,
            session_id,
            None,
            LockLevel::DocumentLock,
        ))
        .await
    }

    /// Acquire a lock on a single element of a document.
    pub async fn lock_element(
        &self,
        lock_id: &str,
        user_login_name: &str,
        user_name: Option<&str>,
        session_id: Option<&str>,
        element_id: &str,
    ) -> Result<LockActionInfo, CoreError> {
        require_non_empty("lock_id", lock_id)?;
        require_non_empty("user_login_name", user_login_name)?;
        require_non_empty("element_id", element_id)?;
        self.acquire(candidate(
            lock_id,
            user_login_name,
            user_name,
            session_id,
            Some(element_id),
            LockLevel::ElementLock,
        ))
        .await
    }

    /// Acquire a read lock.
    pub async fn lock_read(
        &self,
        lock_id: &str,
        user_login_name: &str,
        user_name: Option<&str>,
        session_id: Option<&str>,
    ) -> Result<LockActionInfo, CoreError> {
        require_non_empty("lock_id", lock_id)?;
        require_non_empty("user_login_name", user_login_name)?;
        self.acquire(candidate(
            lock_id,
            user_login_name,
            user_name,
            session_id,
            None,
            LockLevel::ReadLock,
        ))
        .await
    }

    async fn acquire(&self, lock: LockData) -> Result<LockActionInfo, CoreError> {
        let _guard = self.mutation.lock().await;
        let current = self.store.current_locks(&lock.lock_id).await?;

        if current.iter().any(|stored| is_same_lock(&lock, stored)) {
            tracing::debug!(
                lock_id = %lock.lock_id,
                user = %lock.user_login_name,
                "Lock already held by requester"
            );
            return Ok(denied(lock, current));
        }

        if let Some(holder) = find_conflict(&current, &lock) {
            tracing::info!(
                lock_id = %lock.lock_id,
                user = %lock.user_login_name,
                holder = %holder,
                "Lock denied"
            );
            return Ok(denied(lock, current));
        }

        let stored = self.store.store(lock.clone()).await;
        let snapshot = self.store.current_locks(&lock.lock_id).await?;
        tracing::debug!(
            lock_id = %lock.lock_id,
            user = %lock.user_login_name,
            level = ?lock.lock_level,
            "Lock acquired"
        );
        Ok(LockActionInfo {
            success: stored.is_some(),
            operation: LockOperation::Acquire,
            lock: stored.or(Some(lock)),
            current_locks: snapshot,
        })
    }

    // -----------------------------------------------------------------------
    // Release
    // -----------------------------------------------------------------------

    /// Release the lock(s) the probe designates.
    ///
    /// A probe without a `session_id` matches the stored lock regardless of
    /// its session; `success = false` when nothing matched.
    pub async fn unlock(&self, probe: &LockData) -> Result<LockActionInfo, CoreError> {
        require_non_empty("lock_id", &probe.lock_id)?;
        require_non_empty("user_login_name", &probe.user_login_name)?;

        let _guard = self.mutation.lock().await;
        let removed = self.store.remove(probe).await;
        let snapshot = self.store.current_locks(&probe.lock_id).await?;
        if removed.is_some() {
            tracing::debug!(
                lock_id = %probe.lock_id,
                user = %probe.user_login_name,
                "Lock released"
            );
        }
        Ok(LockActionInfo {
            success: removed.is_some(),
            operation: LockOperation::Release,
            lock: removed,
            current_locks: snapshot,
        })
    }

    /// Release every lock held by a session, across all targets.
    ///
    /// Used on session/connection teardown; returns one action info per
    /// released lock so each affected document can be notified.
    pub async fn release_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<LockActionInfo>, CoreError> {
        require_non_empty("session_id", session_id)?;

        let _guard = self.mutation.lock().await;
        let held: Vec<LockData> = self
            .store
            .all_locks()
            .await
            .into_iter()
            .filter(|l| l.session_id.as_deref() == Some(session_id))
            .collect();

        let mut actions = Vec::with_capacity(held.len());
        for probe in held {
            let removed = self.store.remove(&probe).await;
            let snapshot = self.store.current_locks(&probe.lock_id).await?;
            actions.push(LockActionInfo {
                success: removed.is_some(),
                operation: LockOperation::Release,
                lock: removed,
                current_locks: snapshot,
            });
        }
        if !actions.is_empty() {
            tracing::info!(session_id, count = actions.len(), "Session locks released");
        }
        Ok(actions)
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// Current locks on one target.
    pub async fn current_locks(&self, lock_id: &str) -> Result<Vec<LockData>, CoreError> {
        self.store.current_locks(lock_id).await
    }

    /// All locks across all targets.
    pub async fn all_locks(&self) -> Vec<LockData> {
        self.store.all_locks().await
    }
}

impl Default for LockingService {
    fn default() -> Self {
        Self::new()
    }
}

fn candidate(
    lock_id: &str,
    user_login_name: &str,
    user_name: Option<&str>,
    session_id: Option<&str>,
    element_id: Option<&str>,
    lock_level: LockLevel,
) -> LockData {
    LockData {
        lock_id: lock_id.to_string(),
        user_login_name: user_login_name.to_string(),
        user_name: user_name.map(String::from),
        session_id: session_id.map(String::from),
        element_id: element_id.map(String::from),
        lock_level,
        locking_acquired_on: now_millis(),
    }
}

fn denied(lock: LockData, current: Vec<LockData>) -> LockActionInfo {
    LockActionInfo {
        success: false,
        operation: LockOperation::Acquire,
        lock: Some(lock),
        current_locks: current,
    }
}

/// Find a stored lock that forbids the candidate, returning the holder's
/// login. Locks held by the candidate's own user never conflict.
fn find_conflict(current: &[LockData], candidate: &LockData) -> Option<String> {
    current
        .iter()
        .filter(|stored| stored.user_login_name != candidate.user_login_name)
        .find(|stored| match candidate.lock_level {
            LockLevel::ReadLock => false,
            LockLevel::DocumentLock => matches!(
                stored.lock_level,
                LockLevel::DocumentLock | LockLevel::ElementLock
            ),
            LockLevel::ElementLock => match stored.lock_level {
                LockLevel::DocumentLock => true,
                LockLevel::ElementLock => stored.element_id == candidate.element_id,
                LockLevel::ReadLock => false,
            },
        })
        .map(|stored| stored.user_login_name.clone())
}
