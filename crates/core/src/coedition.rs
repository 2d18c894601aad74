//! Co-edition (live presence) records and their matching predicate.
//!
//! Independent of locking: a co-edition record says "this presenter has the
//! document / table of contents / an element open", and is used to render
//! presence indicators in other users' sessions. Matching is keyed on the
//! presenter (one browser tab), not the session.

use serde::{Deserialize, Serialize};

use crate::types::EpochMillis;

// ---------------------------------------------------------------------------
// InfoType
// ---------------------------------------------------------------------------

/// What part of the document a co-edition record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InfoType {
    DocumentInfo,
    TocInfo,
    ElementInfo,
}

// ---------------------------------------------------------------------------
// UserIdentity
// ---------------------------------------------------------------------------

/// Identity fields carried into a co-edition record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub login: String,
    pub name: Option<String>,
    /// Organisational entity (e.g. directorate) of the user.
    pub entity: Option<String>,
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// CoEditionVO
// ---------------------------------------------------------------------------

/// An immutable presence/editing-activity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoEditionVO {
    /// Session that created the record; cleared in one sweep on teardown.
    pub session_id: String,
    /// Owning client (one browser tab / presenter instance).
    pub presenter_id: String,
    pub user_login_name: String,
    pub user_name: Option<String>,
    pub entity: Option<String>,
    pub user_email: Option<String>,
    pub document_id: String,
    /// Element the record refers to, for element-level info.
    pub element_id: Option<String>,
    pub info_type: InfoType,
    /// When the record was stored, epoch millis.
    pub edition_time: EpochMillis,
}

/// Decide whether a probe designates a stored co-edition record.
///
/// Same `document_id`, `presenter_id`, and `info_type`; element-level
/// records additionally require a matching `element_id`. Mirrors the shape
/// of the lock predicate but keyed on presenter rather than session.
pub fn is_same_edit_info(probe: &CoEditionVO, stored: &CoEditionVO) -> bool {
    if probe.document_id != stored.document_id
        || probe.presenter_id != stored.presenter_id
        || probe.info_type != stored.info_type
    {
        return false;
    }

    probe.info_type != InfoType::ElementInfo || probe.element_id == stored.element_id
}

// ---------------------------------------------------------------------------
// CoEditionActionInfo
// ---------------------------------------------------------------------------

/// Operation performed against the co-edition store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoEditionOperation {
    Store,
    Remove,
    Exists,
}

/// Outcome of a co-edition operation.
///
/// `co_edition_infos` is the full current list of records for the affected
/// document after the operation — a consistent snapshot for broadcasting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoEditionActionInfo {
    pub success: bool,
    pub operation: CoEditionOperation,
    /// The record acted upon, when one was found or created.
    pub info: Option<CoEditionVO>,
    pub co_edition_infos: Vec<CoEditionVO>,
}
