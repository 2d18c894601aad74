//! Shared test fixtures for API integration tests.

use std::sync::Arc;

use axum::Router;
use leda_api::config::ServerConfig;
use leda_api::router::build_app_router;
use leda_api::state::AppState;
use leda_api::ws::WsManager;
use leda_events::EventBus;
use leda_store::{CoEditionService, LockingService};

/// Configuration suitable for in-process tests (never actually bound).
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Fresh application state with empty stores.
pub fn test_state(config: &ServerConfig) -> AppState {
    AppState {
        config: Arc::new(config.clone()),
        locking: Arc::new(LockingService::new()),
        coedition: Arc::new(CoEditionService::new()),
        ws_manager: Arc::new(WsManager::new()),
        event_bus: Arc::new(EventBus::default()),
    }
}

/// Full application router with the production middleware stack.
///
/// Clone the returned router for each request — state is shared across
/// clones via `Arc`.
pub fn test_app() -> Router {
    let config = test_config();
    build_app_router(test_state(&config), &config)
}
