//! Handlers for document locking.
//!
//! Lock endpoints allow acquiring, releasing, and querying editorial locks
//! on documents. A denied acquisition is a normal domain outcome: the
//! response is a 200 with `success = false` and the current holders in the
//! snapshot, so the UI can show "document locked by X" without treating it
//! as an error. Only argument-validation failures produce error statuses.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use leda_core::{CollabMessage, LockActionInfo, LockData, LockLevel};

use crate::error::AppResult;
use crate::notifications::publish_collab;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request body for acquiring a lock.
#[derive(Debug, Deserialize)]
pub struct AcquireLockRequest {
    pub document_id: String,
    pub level: LockLevel,
    /// Required when `level` is `ELEMENT_LOCK`.
    pub element_id: Option<String>,
    pub user_login_name: String,
    pub user_name: Option<String>,
    pub session_id: Option<String>,
}

/// Request body for releasing a lock.
#[derive(Debug, Deserialize)]
pub struct ReleaseLockRequest {
    pub document_id: String,
    pub level: LockLevel,
    pub element_id: Option<String>,
    pub user_login_name: String,
    /// When omitted, the release matches the lock regardless of the session
    /// that acquired it.
    pub session_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/collaboration/locks/acquire
///
/// Attempt to acquire a lock on a document. The action info carries the
/// post-operation lock snapshot either way.
pub async fn acquire_lock(
    State(state): State<AppState>,
    Json(input): Json<AcquireLockRequest>,
) -> AppResult<impl IntoResponse> {
    let action = match input.level {
        LockLevel::DocumentLock => {
            state
                .locking
                .lock_document(
                    &input.document_id,
                    &input.user_login_name,
                    input.user_name.as_deref(),
                    input.session_id.as_deref(),
                )
                .await?
        }
        LockLevel::ElementLock => {
            state
                .locking
                .lock_element(
                    &input.document_id,
                    &input.user_login_name,
                    input.user_name.as_deref(),
                    input.session_id.as_deref(),
                    input.element_id.as_deref().unwrap_or_default(),
                )
                .await?
        }
        LockLevel::ReadLock => {
            state
                .locking
                .lock_read(
                    &input.document_id,
                    &input.user_login_name,
                    input.user_name.as_deref(),
                    input.session_id.as_deref(),
                )
                .await?
        }
    };

    if action.success {
        tracing::info!(
            user = %input.user_login_name,
            document_id = %input.document_id,
            level = ?input.level,
            "Lock acquired"
        );
        broadcast_lock_update(&state, &input.document_id, &input.user_login_name, &action);
    } else {
        let holder = holder_login(&action, &input.user_login_name);
        tracing::info!(
            user = %input.user_login_name,
            document_id = %input.document_id,
            holder = %holder,
            "Lock denied"
        );
        publish_collab(
            &state.event_bus,
            "lock.denied",
            &input.document_id,
            Some(&input.user_login_name),
            &CollabMessage::LockDenied {
                lock_id: input.document_id.clone(),
                holder,
            },
        );
    }

    Ok(Json(DataResponse { data: action }))
}

/// POST /api/v1/collaboration/locks/release
///
/// Release a held lock. `success = false` when nothing matched.
pub async fn release_lock(
    State(state): State<AppState>,
    Json(input): Json<ReleaseLockRequest>,
) -> AppResult<impl IntoResponse> {
    let probe = LockData {
        lock_id: input.document_id.clone(),
        user_login_name: input.user_login_name.clone(),
        user_name: None,
        session_id: input.session_id.clone(),
        element_id: input.element_id.clone(),
        lock_level: input.level,
        locking_acquired_on: 0,
    };

    let action = state.locking.unlock(&probe).await?;

    if action.success {
        tracing::info!(
            user = %input.user_login_name,
            document_id = %input.document_id,
            "Lock released"
        );
        broadcast_lock_update(&state, &input.document_id, &input.user_login_name, &action);
    }

    Ok(Json(DataResponse { data: action }))
}

/// GET /api/v1/collaboration/locks/{document_id}
///
/// Current lock snapshot for one document.
pub async fn get_locks(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let locks = state.locking.current_locks(&document_id).await?;
    Ok(Json(DataResponse { data: locks }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn broadcast_lock_update(
    state: &AppState,
    document_id: &str,
    actor: &str,
    action: &LockActionInfo,
) {
    let event_type = match action.operation {
        leda_core::LockOperation::Acquire => "lock.acquired",
        _ => "lock.released",
    };
    publish_collab(
        &state.event_bus,
        event_type,
        document_id,
        Some(actor),
        &CollabMessage::LockUpdate {
            lock_id: document_id.to_string(),
            action: action.clone(),
        },
    );
}

/// Login of a current holder other than the requester, for the denial
/// message. Falls back to the requester's own login for a duplicate
/// acquisition.
fn holder_login(action: &LockActionInfo, requester: &str) -> String {
    action
        .current_locks
        .iter()
        .find(|l| l.user_login_name != requester)
        .map(|l| l.user_login_name.clone())
        .unwrap_or_else(|| requester.to_string())
}
