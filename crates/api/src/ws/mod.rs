//! WebSocket infrastructure for real-time collaboration.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handler used by Axum routes. The connection id doubles as the
//! collaboration session id: presence records and locks created over a
//! connection are swept when it closes.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::{start_heartbeat, start_heartbeat_with_interval};
pub use manager::WsManager;
