use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Default interval between heartbeat pings.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn a background task that sends periodic Ping frames to all connected
/// WebSocket clients, so intermediaries keep idle editing sessions alive
/// and dead connections surface as send errors.
///
/// The task runs until the provided `WsManager` is dropped (which happens
/// during shutdown). The returned `JoinHandle` can be used to abort the task
/// explicitly if needed.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> tokio::task::JoinHandle<()> {
    start_heartbeat_with_interval(ws_manager, HEARTBEAT_INTERVAL)
}

/// [`start_heartbeat`] with a caller-chosen interval (shortened in tests).
pub fn start_heartbeat_with_interval(
    ws_manager: Arc<WsManager>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            let count = ws_manager.connection_count().await;
            if count == 0 {
                continue;
            }
            tracing::trace!(count, "WebSocket heartbeat ping");
            ws_manager.ping_all().await;
        }
    })
}
