//! Event → WebSocket fan-out.
//!
//! Handlers publish [`CollabEvent`]s whose payload is a serialized
//! [`CollabMessage`]; the [`EventForwarder`] subscribes to the bus and
//! broadcasts each payload to every connected client. Keeping the bus in
//! the middle means other subscribers (audit, metrics) can observe the same
//! stream without touching the WebSocket layer.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;

use leda_core::CollabMessage;
use leda_events::{CollabEvent, EventBus};

use crate::ws::WsManager;

/// Publish a collaboration event carrying a WebSocket message as payload.
///
/// The envelope (`event_type`, `document_id`, `actor`, timestamp) is for bus
/// subscribers; the payload is what ends up on the wire.
pub fn publish_collab(
    bus: &EventBus,
    event_type: &str,
    document_id: &str,
    actor: Option<&str>,
    message: &CollabMessage,
) {
    let payload = match serde_json::to_value(message) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, event_type, "Failed to serialize collab message");
            return;
        }
    };

    let mut event = CollabEvent::new(event_type)
        .with_document(document_id)
        .with_payload(payload);
    if let Some(actor) = actor {
        event = event.with_actor(actor);
    }
    bus.publish(event);
}

/// Background service that forwards bus events to WebSocket clients.
pub struct EventForwarder {
    ws_manager: Arc<WsManager>,
}

impl EventForwarder {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Consume events until the bus is closed.
    ///
    /// Events without a payload stay on the bus only (observability
    /// entries); everything else is broadcast verbatim.
    pub async fn run(self, mut rx: broadcast::Receiver<CollabEvent>) {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let empty = match &event.payload {
                        serde_json::Value::Null => true,
                        serde_json::Value::Object(map) => map.is_empty(),
                        _ => false,
                    };
                    if empty {
                        continue;
                    }
                    let text = event.payload.to_string();
                    tracing::debug!(
                        event_type = %event.event_type,
                        document_id = ?event.document_id,
                        "Broadcasting collaboration event"
                    );
                    self.ws_manager.broadcast(Message::Text(text.into())).await;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event forwarder lagged behind the bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::info!("Event forwarder stopped");
    }
}
