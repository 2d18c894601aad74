//! Leda coordination stores and the document query engine.
//!
//! This crate provides:
//!
//! - [`LockStore`] — the dumb in-memory lock CRUD store.
//! - [`LockingService`] — the policy layer enforcing lock-conflict rules on
//!   top of the store.
//! - [`CoEditionService`] — the live-presence store, fully serialized behind
//!   one read-write lock.
//! - [`QueryFilter`] — typed filter criteria rendered into the document
//!   store's SQL-like predicate language.
//! - [`DocumentRepository`] — version-selection queries over a pluggable
//!   [`DocumentStore`] backend.

pub mod coedition;
pub mod lock_store;
pub mod locking;
pub mod query;
pub mod versions;

pub use coedition::CoEditionService;
pub use lock_store::LockStore;
pub use locking::LockingService;
pub use query::{Filter, Operator, QueryFilter};
pub use versions::{DocumentRepository, DocumentStore, DocumentVersion, VersionType};
