//! Co-edition (live presence) service.
//!
//! Tracks which presenter has which document / table of contents / element
//! open. The whole store is serialized through one process-wide read-write
//! lock: readers run concurrently, writers are exclusive, and every
//! check-then-act pair (exists-check then insert/remove) happens under a
//! single write-lock acquisition, so no two tasks can observe or create
//! duplicate records for the same logical identity.

use tokio::sync::RwLock;

use leda_core::error::require_non_empty;
use leda_core::types::now_millis;
use leda_core::{
    is_same_edit_info, CoEditionActionInfo, CoEditionOperation, CoEditionVO, CoreError, InfoType,
    UserIdentity,
};

/// Process-wide store of co-edition records.
///
/// Designed to be wrapped in `Arc` and shared across the application.
pub struct CoEditionService {
    infos: RwLock<Vec<CoEditionVO>>,
}

impl CoEditionService {
    pub fn new() -> Self {
        Self {
            infos: RwLock::new(Vec::new()),
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Store a co-edition record for a presenter, unless an equal record
    /// already exists.
    ///
    /// Idempotent: a second call with the same presenter/document/element/
    /// info-type returns `success = false` with operation `EXISTS`, the
    /// already-stored record, and an unchanged snapshot.
    pub async fn store_user_edit_info(
        &self,
        session_id: &str,
        presenter_id: &str,
        user: &UserIdentity,
        document_id: &str,
        element_id: Option<&str>,
        info_type: InfoType,
    ) -> Result<CoEditionActionInfo, CoreError> {
        require_non_empty("session_id", session_id)?;
        require_non_empty("presenter_id", presenter_id)?;
        require_non_empty("user_login_name", &user.login)?;
        require_non_empty("document_id", document_id)?;

        let record = CoEditionVO {
            session_id: session_id.to_string(),
            presenter_id: presenter_id.to_string(),
            user_login_name: user.login.clone(),
            user_name: user.name.clone(),
            entity: user.entity.clone(),
            user_email: user.email.clone(),
            document_id: document_id.to_string(),
            element_id: element_id.map(String::from),
            info_type,
            edition_time: now_millis(),
        };

        let mut infos = self.infos.write().await;

        if let Some(existing) = infos.iter().find(|stored| is_same_edit_info(&record, stored)) {
            let existing = existing.clone();
            return Ok(CoEditionActionInfo {
                success: false,
                operation: CoEditionOperation::Exists,
                co_edition_infos: snapshot_for(&infos, document_id),
                info: Some(existing),
            });
        }

        infos.push(record.clone());
        tracing::debug!(
            document_id,
            presenter_id,
            info_type = ?info_type,
            "Co-edition info stored"
        );
        Ok(CoEditionActionInfo {
            success: true,
            operation: CoEditionOperation::Store,
            co_edition_infos: snapshot_for(&infos, document_id),
            info: Some(record),
        })
    }

    /// Remove the record matching the presenter-scoped identity, if any.
    pub async fn remove_user_edit_info(
        &self,
        presenter_id: &str,
        document_id: &str,
        element_id: Option<&str>,
        info_type: InfoType,
    ) -> Result<CoEditionActionInfo, CoreError> {
        require_non_empty("presenter_id", presenter_id)?;
        require_non_empty("document_id", document_id)?;

        let probe = CoEditionVO {
            session_id: String::new(),
            presenter_id: presenter_id.to_string(),
            user_login_name: String::new(),
            user_name: None,
            entity: None,
            user_email: None,
            document_id: document_id.to_string(),
            element_id: element_id.map(String::from),
            info_type,
            edition_time: 0,
        };

        let mut infos = self.infos.write().await;
        let removed = match infos.iter().position(|stored| is_same_edit_info(&probe, stored)) {
            Some(idx) => Some(infos.remove(idx)),
            None => None,
        };

        if removed.is_some() {
            tracing::debug!(document_id, presenter_id, "Co-edition info removed");
        }
        Ok(CoEditionActionInfo {
            success: removed.is_some(),
            operation: CoEditionOperation::Remove,
            co_edition_infos: snapshot_for(&infos, document_id),
            info: removed,
        })
    }

    /// Remove the record belonging to a disconnecting session.
    ///
    /// At most one record is removed.
    // TODO: a session editing two elements in separate browser tabs leaves
    // the second record behind; confirm the intended scope with product
    // before widening this to a full sweep.
    pub async fn remove_session_info(
        &self,
        session_id: &str,
    ) -> Result<CoEditionActionInfo, CoreError> {
        require_non_empty("session_id", session_id)?;

        let mut infos = self.infos.write().await;
        let removed = match infos.iter().position(|stored| stored.session_id == session_id) {
            Some(idx) => Some(infos.remove(idx)),
            None => None,
        };

        let document_id = removed
            .as_ref()
            .map(|r| r.document_id.clone())
            .unwrap_or_default();
        if removed.is_some() {
            tracing::debug!(session_id, document_id = %document_id, "Session co-edition info removed");
        }
        Ok(CoEditionActionInfo {
            success: removed.is_some(),
            operation: CoEditionOperation::Remove,
            co_edition_infos: snapshot_for(&infos, &document_id),
            info: removed,
        })
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// All records across all documents.
    pub async fn get_all_edit_info(&self) -> Vec<CoEditionVO> {
        self.infos.read().await.clone()
    }

    /// Records for one document.
    pub async fn get_current_edit_info(&self, document_id: &str) -> Vec<CoEditionVO> {
        snapshot_for(&self.infos.read().await, document_id)
    }
}

impl Default for CoEditionService {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot_for(infos: &[CoEditionVO], document_id: &str) -> Vec<CoEditionVO> {
    infos
        .iter()
        .filter(|i| i.document_id == document_id)
        .cloned()
        .collect()
}
