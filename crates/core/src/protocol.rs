//! Collaboration WebSocket message protocol.
//!
//! Serialized as JSON with an internally-tagged `"type"` discriminator so
//! that the frontend can route messages by type string.

use serde::{Deserialize, Serialize};

use crate::coedition::{CoEditionVO, InfoType};
use crate::locking::LockActionInfo;

/// Messages exchanged over WebSocket for real-time collaboration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum CollabMessage {
    /// Client sends: this presenter now has (part of) a document open.
    #[serde(rename = "presence.join")]
    PresenceJoin {
        document_id: String,
        element_id: Option<String>,
        info_type: InfoType,
    },

    /// Client sends: this presenter no longer has it open.
    #[serde(rename = "presence.leave")]
    PresenceLeave {
        document_id: String,
        element_id: Option<String>,
        info_type: InfoType,
    },

    /// Server broadcasts: updated co-edition list for a document.
    #[serde(rename = "presence.update")]
    PresenceUpdate {
        document_id: String,
        infos: Vec<CoEditionVO>,
    },

    /// Server broadcasts: a lock was acquired or released on a document.
    #[serde(rename = "lock.update")]
    LockUpdate {
        lock_id: String,
        action: LockActionInfo,
    },

    /// Server broadcasts: a lock acquisition was denied.
    #[serde(rename = "lock.denied")]
    LockDenied { lock_id: String, holder: String },

    /// Server sends to one client: a message could not be processed.
    #[serde(rename = "error")]
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locking::LockOperation;

    #[test]
    fn test_presence_join_serialization() {
        let msg = CollabMessage::PresenceJoin {
            document_id: "doc-1".to_string(),
            element_id: None,
            info_type: InfoType::DocumentInfo,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"presence.join"#));

        let deserialized: CollabMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
    }

    #[test]
    fn test_presence_leave_serialization() {
        let msg = CollabMessage::PresenceLeave {
            document_id: "doc-1".to_string(),
            element_id: Some("art-7".to_string()),
            info_type: InfoType::ElementInfo,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"presence.leave"#));

        let deserialized: CollabMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
    }

    #[test]
    fn test_presence_update_serialization() {
        let msg = CollabMessage::PresenceUpdate {
            document_id: "doc-1".to_string(),
            infos: Vec::new(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"presence.update"#));

        let deserialized: CollabMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
    }

    #[test]
    fn test_lock_update_serialization() {
        let msg = CollabMessage::LockUpdate {
            lock_id: "doc-1".to_string(),
            action: LockActionInfo {
                success: true,
                operation: LockOperation::Acquire,
                lock: None,
                current_locks: Vec::new(),
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"lock.update"#));
        assert!(json.contains(r#""operation":"ACQUIRE"#));

        let deserialized: CollabMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
    }

    #[test]
    fn test_lock_denied_serialization() {
        let msg = CollabMessage::LockDenied {
            lock_id: "doc-1".to_string(),
            holder: "jane".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"lock.denied"#));

        let deserialized: CollabMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
    }
}
