//! Document lock records and the lock-matching predicate.
//!
//! A lock here is an editorial record ("user X is editing article 12 of
//! document Y"), not a runtime mutex: acquisition is a single in-memory
//! operation that either succeeds or is denied immediately, and a denied
//! caller reacts at the UI level instead of blocking.

use serde::{Deserialize, Serialize};

use crate::types::EpochMillis;

// ---------------------------------------------------------------------------
// LockLevel
// ---------------------------------------------------------------------------

/// Granularity of a lock on a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockLevel {
    /// The holder is reading the document; coexists with everything.
    ReadLock,
    /// The holder is editing a single element of the document.
    ElementLock,
    /// The holder has the whole document open for editing.
    DocumentLock,
}

// ---------------------------------------------------------------------------
// LockData
// ---------------------------------------------------------------------------

/// An immutable lock record.
///
/// `element_id` is meaningful only when `lock_level` is
/// [`LockLevel::ElementLock`]; for the other levels it is ignored by the
/// matching predicate. The derived `PartialEq` is plain structural equality —
/// business matching goes through [`is_same_lock`] instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockData {
    /// Identifier of the locked target (document scope).
    pub lock_id: String,
    /// Login of the lock owner.
    pub user_login_name: String,
    /// Display name of the owner, when known.
    pub user_name: Option<String>,
    /// Session that acquired the lock, when known.
    pub session_id: Option<String>,
    /// Locked element, for element-level locks.
    pub element_id: Option<String>,
    pub lock_level: LockLevel,
    /// Acquisition time, epoch millis.
    pub locking_acquired_on: EpochMillis,
}

/// Decide whether a `probe` lock designates the `stored` lock.
///
/// `lock_id`, `user_login_name`, and `lock_level` must match. For
/// element-level locks the `element_id` must match as well; document and
/// read locks ignore it.
///
/// The session rule is deliberately asymmetric: a probe with no
/// `session_id` matches a stored lock regardless of its session (so a
/// "remove by user and level" request that does not know the session can
/// still match), while a probe carrying a session matches only the stored
/// lock with the identical one. Callers must not "fix" this by making the
/// comparison symmetric.
pub fn is_same_lock(probe: &LockData, stored: &LockData) -> bool {
    if probe.lock_id != stored.lock_id
        || probe.user_login_name != stored.user_login_name
        || probe.lock_level != stored.lock_level
    {
        return false;
    }

    if probe.lock_level == LockLevel::ElementLock && probe.element_id != stored.element_id {
        return false;
    }

    match &probe.session_id {
        None => true,
        Some(session) => stored.session_id.as_ref() == Some(session),
    }
}

// ---------------------------------------------------------------------------
// LockActionInfo
// ---------------------------------------------------------------------------

/// Operation performed against the lock store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockOperation {
    Acquire,
    Release,
    Exists,
}

/// Outcome of a locking operation, including a consistent post-operation
/// snapshot of the target's locks for broadcasting to other sessions.
///
/// A denial is `success = false` with the current holders in
/// `current_locks`; it is never surfaced as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockActionInfo {
    pub success: bool,
    pub operation: LockOperation,
    /// The lock acted upon (the candidate, for a denied acquisition).
    pub lock: Option<LockData>,
    /// Snapshot of the target's locks after the operation.
    pub current_locks: Vec<LockData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lock(level: LockLevel, element: Option<&str>, session: Option<&str>) -> LockData {
        LockData {
            lock_id: "doc-1".into(),
            user_login_name: "jane".into(),
            user_name: Some("Jane Doe".into()),
            session_id: session.map(String::from),
            element_id: element.map(String::from),
            lock_level: level,
            locking_acquired_on: 1_700_000_000_000,
        }
    }

    // -----------------------------------------------------------------------
    // Core field matching
    // -----------------------------------------------------------------------

    #[test]
    fn test_same_lock_matches_identical_document_lock() {
        let stored = lock(LockLevel::DocumentLock, None, Some("s1"));
        let probe = lock(LockLevel::DocumentLock, None, Some("s1"));
        assert!(is_same_lock(&probe, &stored));
    }

    #[test]
    fn test_different_target_does_not_match() {
        let stored = lock(LockLevel::DocumentLock, None, None);
        let mut probe = lock(LockLevel::DocumentLock, None, None);
        probe.lock_id = "doc-2".into();
        assert!(!is_same_lock(&probe, &stored));
    }

    #[test]
    fn test_different_owner_does_not_match() {
        let stored = lock(LockLevel::DocumentLock, None, None);
        let mut probe = lock(LockLevel::DocumentLock, None, None);
        probe.user_login_name = "john".into();
        assert!(!is_same_lock(&probe, &stored));
    }

    #[test]
    fn test_different_level_does_not_match() {
        let stored = lock(LockLevel::DocumentLock, None, None);
        let probe = lock(LockLevel::ReadLock, None, None);
        assert!(!is_same_lock(&probe, &stored));
    }

    // -----------------------------------------------------------------------
    // Element-conditional comparison
    // -----------------------------------------------------------------------

    #[test]
    fn test_element_lock_requires_matching_element() {
        let stored = lock(LockLevel::ElementLock, Some("art-1"), None);
        let probe = lock(LockLevel::ElementLock, Some("art-2"), None);
        assert!(!is_same_lock(&probe, &stored));
    }

    #[test]
    fn test_element_lock_matches_on_same_element() {
        let stored = lock(LockLevel::ElementLock, Some("art-1"), None);
        let probe = lock(LockLevel::ElementLock, Some("art-1"), None);
        assert!(is_same_lock(&probe, &stored));
    }

    #[test]
    fn test_document_lock_ignores_element_id() {
        let stored = lock(LockLevel::DocumentLock, Some("art-1"), None);
        let probe = lock(LockLevel::DocumentLock, Some("art-2"), None);
        assert!(is_same_lock(&probe, &stored));
    }

    // -----------------------------------------------------------------------
    // Asymmetric session matching
    // -----------------------------------------------------------------------

    #[test]
    fn test_probe_without_session_matches_any_stored_session() {
        let stored = lock(LockLevel::DocumentLock, None, Some("s1"));
        let probe = lock(LockLevel::DocumentLock, None, None);
        assert!(is_same_lock(&probe, &stored));
    }

    #[test]
    fn test_probe_with_session_requires_identical_stored_session() {
        let stored = lock(LockLevel::DocumentLock, None, Some("s1"));
        let probe = lock(LockLevel::DocumentLock, None, Some("s2"));
        assert!(!is_same_lock(&probe, &stored));
    }

    #[test]
    fn test_probe_with_session_does_not_match_sessionless_stored_lock() {
        let stored = lock(LockLevel::DocumentLock, None, None);
        let probe = lock(LockLevel::DocumentLock, None, Some("s1"));
        assert!(!is_same_lock(&probe, &stored));
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    #[test]
    fn test_lock_level_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&LockLevel::DocumentLock).unwrap(),
            r#""DOCUMENT_LOCK""#
        );
        assert_eq!(
            serde_json::to_string(&LockLevel::ElementLock).unwrap(),
            r#""ELEMENT_LOCK""#
        );
        assert_eq!(
            serde_json::to_string(&LockLevel::ReadLock).unwrap(),
            r#""READ_LOCK""#
        );
    }
}
