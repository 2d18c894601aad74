//! Leda core domain types.
//!
//! This crate holds the value objects, equality predicates, error taxonomy,
//! and WebSocket message protocol shared by the store, events, and API
//! layers. It has no internal dependencies so that every other crate can
//! reference the same lock/presence semantics.

pub mod coedition;
pub mod error;
pub mod locking;
pub mod protocol;
pub mod types;

pub use coedition::{
    is_same_edit_info, CoEditionActionInfo, CoEditionOperation, CoEditionVO, InfoType,
    UserIdentity,
};
pub use error::CoreError;
pub use locking::{is_same_lock, LockActionInfo, LockData, LockLevel, LockOperation};
pub use protocol::CollabMessage;
