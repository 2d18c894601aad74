use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use leda_core::{CollabMessage, InfoType, UserIdentity};

use crate::notifications::publish_collab;
use crate::state::AppState;

/// Identity announced by the client at upgrade time.
///
/// Presence messages sent over a connection without `presenter_id` and
/// `user_login` are rejected with an `error` message.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub presenter_id: Option<String>,
    pub user_login: Option<String>,
    pub user_name: Option<String>,
    pub entity: Option<String>,
    pub email: Option<String>,
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with `WsManager` and
/// managed by two tasks (sender + receiver). The generated connection id is
/// the session id under which presence records and locks are created and
/// later swept.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Dispatches inbound presence messages on the current task.
///   4. Tears down presence and locks on disconnect.
async fn handle_socket(socket: WebSocket, state: AppState, query: WsQuery) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, presenter = ?query.presenter_id, "WebSocket connected");

    // Register and get the receiver for outbound messages.
    let mut rx = state
        .ws_manager
        .add(conn_id.clone(), query.presenter_id.clone())
        .await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                dispatch_text(&state, &conn_id, &query, &text).await;
            }
            Ok(_msg) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: sweep presence and locks, remove connection, stop sender.
    teardown(&state, &conn_id).await;
    state.ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Parse and dispatch one inbound text frame.
async fn dispatch_text(state: &AppState, conn_id: &str, query: &WsQuery, text: &str) {
    let message: CollabMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Unparseable WebSocket message");
            reply_error(state, conn_id, "unparseable message").await;
            return;
        }
    };

    match message {
        CollabMessage::PresenceJoin {
            document_id,
            element_id,
            info_type,
        } => {
            presence_join(state, conn_id, query, &document_id, element_id, info_type).await;
        }
        CollabMessage::PresenceLeave {
            document_id,
            element_id,
            info_type,
        } => {
            presence_leave(state, conn_id, query, &document_id, element_id, info_type).await;
        }
        other => {
            tracing::warn!(conn_id = %conn_id, message = ?other, "Unhandled WebSocket message");
        }
    }
}

async fn presence_join(
    state: &AppState,
    conn_id: &str,
    query: &WsQuery,
    document_id: &str,
    element_id: Option<String>,
    info_type: InfoType,
) {
    let Some((presenter_id, user)) = announced_identity(query) else {
        reply_error(state, conn_id, "presence requires presenter_id and user_login").await;
        return;
    };

    let result = state
        .coedition
        .store_user_edit_info(
            conn_id,
            &presenter_id,
            &user,
            document_id,
            element_id.as_deref(),
            info_type,
        )
        .await;

    match result {
        Ok(action) if action.success => {
            publish_collab(
                &state.event_bus,
                "presence.stored",
                document_id,
                Some(&user.login),
                &CollabMessage::PresenceUpdate {
                    document_id: document_id.to_string(),
                    infos: action.co_edition_infos,
                },
            );
        }
        Ok(_) => {
            // Already present: idempotent, nothing to broadcast.
        }
        Err(e) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "Presence join rejected");
            reply_error(state, conn_id, &e.to_string()).await;
        }
    }
}

async fn presence_leave(
    state: &AppState,
    conn_id: &str,
    query: &WsQuery,
    document_id: &str,
    element_id: Option<String>,
    info_type: InfoType,
) {
    let Some((presenter_id, user)) = announced_identity(query) else {
        reply_error(state, conn_id, "presence requires presenter_id and user_login").await;
        return;
    };

    let result = state
        .coedition
        .remove_user_edit_info(&presenter_id, document_id, element_id.as_deref(), info_type)
        .await;

    match result {
        Ok(action) if action.success => {
            publish_collab(
                &state.event_bus,
                "presence.removed",
                document_id,
                Some(&user.login),
                &CollabMessage::PresenceUpdate {
                    document_id: document_id.to_string(),
                    infos: action.co_edition_infos,
                },
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "Presence leave rejected");
            reply_error(state, conn_id, &e.to_string()).await;
        }
    }
}

/// Sweep the disconnecting session's presence record and locks, notifying
/// the affected documents.
async fn teardown(state: &AppState, conn_id: &str) {
    if let Ok(action) = state.coedition.remove_session_info(conn_id).await {
        if action.success {
            if let Some(info) = &action.info {
                publish_collab(
                    &state.event_bus,
                    "presence.removed",
                    &info.document_id,
                    Some(&info.user_login_name),
                    &CollabMessage::PresenceUpdate {
                        document_id: info.document_id.clone(),
                        infos: action.co_edition_infos.clone(),
                    },
                );
            }
        }
    }

    match state.locking.release_session(conn_id).await {
        Ok(actions) => {
            for action in actions {
                let Some(lock) = &action.lock else { continue };
                publish_collab(
                    &state.event_bus,
                    "lock.released",
                    &lock.lock_id,
                    Some(&lock.user_login_name),
                    &CollabMessage::LockUpdate {
                        lock_id: lock.lock_id.clone(),
                        action: action.clone(),
                    },
                );
            }
        }
        Err(e) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "Session lock sweep failed");
        }
    }
}

fn announced_identity(query: &WsQuery) -> Option<(String, UserIdentity)> {
    let presenter_id = query.presenter_id.clone()?;
    let login = query.user_login.clone()?;
    Some((
        presenter_id,
        UserIdentity {
            login,
            name: query.user_name.clone(),
            entity: query.entity.clone(),
            email: query.email.clone(),
        },
    ))
}

async fn reply_error(state: &AppState, conn_id: &str, message: &str) {
    let reply = CollabMessage::Error {
        message: message.to_string(),
    };
    match serde_json::to_string(&reply) {
        Ok(json) => {
            state
                .ws_manager
                .send_to_session(conn_id, Message::Text(json.into()))
                .await;
        }
        Err(e) => tracing::error!(error = %e, "Failed to serialize error reply"),
    }
}
