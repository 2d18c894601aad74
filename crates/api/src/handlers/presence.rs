//! Handlers for co-edition (live presence).
//!
//! Presence endpoints mirror the WebSocket `presence.join` /
//! `presence.leave` messages for clients that talk plain HTTP, and expose
//! snapshot queries for the presence indicators.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use leda_core::{CoEditionActionInfo, CollabMessage, InfoType, UserIdentity};

use crate::error::AppResult;
use crate::notifications::publish_collab;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request body for registering presence.
#[derive(Debug, Deserialize)]
pub struct JoinPresenceRequest {
    pub session_id: String,
    pub presenter_id: String,
    pub user: UserIdentity,
    pub document_id: String,
    pub element_id: Option<String>,
    pub info_type: InfoType,
}

/// Request body for withdrawing presence.
#[derive(Debug, Deserialize)]
pub struct LeavePresenceRequest {
    pub presenter_id: String,
    pub document_id: String,
    pub element_id: Option<String>,
    pub info_type: InfoType,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/collaboration/presence/join
///
/// Register that a presenter has (part of) a document open. Idempotent: a
/// duplicate returns `success = false` with operation `EXISTS` and leaves
/// the store unchanged.
pub async fn join_presence(
    State(state): State<AppState>,
    Json(input): Json<JoinPresenceRequest>,
) -> AppResult<impl IntoResponse> {
    let action = state
        .coedition
        .store_user_edit_info(
            &input.session_id,
            &input.presenter_id,
            &input.user,
            &input.document_id,
            input.element_id.as_deref(),
            input.info_type,
        )
        .await?;

    if action.success {
        broadcast_presence_update(&state, "presence.stored", &input.document_id, &input.user.login, &action);
    }

    Ok(Json(DataResponse { data: action }))
}

/// POST /api/v1/collaboration/presence/leave
///
/// Withdraw a presenter's presence record.
pub async fn leave_presence(
    State(state): State<AppState>,
    Json(input): Json<LeavePresenceRequest>,
) -> AppResult<impl IntoResponse> {
    let action = state
        .coedition
        .remove_user_edit_info(
            &input.presenter_id,
            &input.document_id,
            input.element_id.as_deref(),
            input.info_type,
        )
        .await?;

    if action.success {
        let actor = action
            .info
            .as_ref()
            .map(|i| i.user_login_name.clone())
            .unwrap_or_default();
        broadcast_presence_update(&state, "presence.removed", &input.document_id, &actor, &action);
    }

    Ok(Json(DataResponse { data: action }))
}

/// GET /api/v1/collaboration/presence/{document_id}
///
/// Co-edition records for one document.
pub async fn get_presence(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let infos = state.coedition.get_current_edit_info(&document_id).await;
    Ok(Json(DataResponse { data: infos }))
}

/// GET /api/v1/collaboration/presence
///
/// All co-edition records across all documents.
pub async fn get_all_presence(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let infos = state.coedition.get_all_edit_info().await;
    Ok(Json(DataResponse { data: infos }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn broadcast_presence_update(
    state: &AppState,
    event_type: &str,
    document_id: &str,
    actor: &str,
    action: &CoEditionActionInfo,
) {
    publish_collab(
        &state.event_bus,
        event_type,
        document_id,
        (!actor.is_empty()).then_some(actor),
        &CollabMessage::PresenceUpdate {
            document_id: document_id.to_string(),
            infos: action.co_edition_infos.clone(),
        },
    );
}
