pub mod collaboration;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                              WebSocket
///
/// /collaboration/locks/acquire                     acquire a lock (POST)
/// /collaboration/locks/release                     release a lock (POST)
/// /collaboration/locks/{document_id}               lock snapshot (GET)
/// /collaboration/presence/join                     register presence (POST)
/// /collaboration/presence/leave                    withdraw presence (POST)
/// /collaboration/presence                          all records (GET)
/// /collaboration/presence/{document_id}            document records (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/collaboration", collaboration::router())
}
