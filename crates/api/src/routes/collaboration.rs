//! Route definitions for real-time collaboration.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{locks, presence};
use crate::state::AppState;

/// Collaboration routes mounted at `/collaboration`.
///
/// ```text
/// POST /locks/acquire                  -> acquire_lock
/// POST /locks/release                  -> release_lock
/// GET  /locks/{document_id}            -> get_locks
/// POST /presence/join                  -> join_presence
/// POST /presence/leave                 -> leave_presence
/// GET  /presence                       -> get_all_presence
/// GET  /presence/{document_id}         -> get_presence
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locks/acquire", post(locks::acquire_lock))
        .route("/locks/release", post(locks::release_lock))
        .route("/locks/{document_id}", get(locks::get_locks))
        .route("/presence/join", post(presence::join_presence))
        .route("/presence/leave", post(presence::leave_presence))
        .route("/presence", get(presence::get_all_presence))
        .route("/presence/{document_id}", get(presence::get_presence))
}
