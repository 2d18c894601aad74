//! Leda event bus.
//!
//! Provides [`EventBus`] — the in-process publish/subscribe hub backed by
//! `tokio::sync::broadcast` — and [`CollabEvent`], the canonical domain
//! event envelope published by the lock and presence handlers and fanned
//! out to connected WebSocket clients.

pub mod bus;

pub use bus::{CollabEvent, EventBus};
