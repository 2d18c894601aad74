use std::sync::Arc;

use leda_events::EventBus;
use leda_store::{CoEditionService, LockingService};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Document locking policy service.
    pub locking: Arc<LockingService>,
    /// Co-edition (live presence) service.
    pub coedition: Arc<CoEditionService>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing collaboration events.
    pub event_bus: Arc<EventBus>,
}
