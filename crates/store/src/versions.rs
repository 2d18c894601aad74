//! Version selection over the external document store.
//!
//! The document store itself (a CMIS-style versioned repository) is an
//! external collaborator reached through the [`DocumentStore`] trait; this
//! module owns only the predicate-construction policy: which filters, which
//! operators, and which literal forms select the version sets callers ask
//! for.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use leda_core::error::require_non_empty;
use leda_core::types::Timestamp;
use leda_core::CoreError;

use crate::query::{Filter, QueryFilter};

// ---------------------------------------------------------------------------
// VersionType
// ---------------------------------------------------------------------------

/// Kind of a stored document version.
///
/// The store persists the kind as a numeric code; predicates must carry the
/// numeric string form (`'2'`), never the symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionType {
    Minor,
    Intermediate,
    Major,
}

impl VersionType {
    /// Numeric code as persisted by the document store.
    pub fn code(self) -> u8 {
        match self {
            VersionType::Minor => 0,
            VersionType::Intermediate => 1,
            VersionType::Major => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// DocumentVersion
// ---------------------------------------------------------------------------

/// One version of a document as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVersion {
    /// Store object id of this version.
    pub object_id: String,
    /// Application version label, e.g. `0.1.0`.
    pub version_label: String,
    /// Raw store version number, e.g. `1.3`.
    pub cmis_version_label: String,
    pub version_type: VersionType,
    pub created_on: Timestamp,
}

// ---------------------------------------------------------------------------
// DocumentStore
// ---------------------------------------------------------------------------

/// Seam to the external versioned document store.
///
/// Implementations execute a rendered statement against the backing store
/// and map the results; they own connection handling, paging, and the wire
/// protocol.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn query(&self, statement: &str) -> Result<Vec<DocumentVersion>, CoreError>;
}

// ---------------------------------------------------------------------------
// DocumentRepository
// ---------------------------------------------------------------------------

const SELECT_VERSIONS: &str = "SELECT * FROM leos:document";

/// Version-selection queries over a [`DocumentStore`] backend.
pub struct DocumentRepository<B> {
    backend: B,
}

impl<B: DocumentStore> DocumentRepository<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All major and intermediate versions of a document.
    pub async fn find_major_and_intermediate_versions(
        &self,
        doc_ref: &str,
    ) -> Result<Vec<DocumentVersion>, CoreError> {
        require_non_empty("doc_ref", doc_ref)?;
        let filter = QueryFilter::new()
            .with(Filter::eq("ref", doc_ref))
            .with(Filter::in_list(
                "versionType",
                vec![
                    VersionType::Major.code().to_string(),
                    VersionType::Intermediate.code().to_string(),
                ],
            ));
        self.run(&filter).await
    }

    /// Minor versions strictly between two version labels.
    pub async fn find_minor_versions_between(
        &self,
        doc_ref: &str,
        start_label: &str,
        end_label: &str,
    ) -> Result<Vec<DocumentVersion>, CoreError> {
        require_non_empty("doc_ref", doc_ref)?;
        require_non_empty("start_label", start_label)?;
        require_non_empty("end_label", end_label)?;
        let filter = QueryFilter::new()
            .with(Filter::eq("ref", doc_ref))
            .with(Filter::less_than("versionLabel", end_label))
            .with(Filter::greater_than("versionLabel", start_label));
        self.run(&filter).await
    }

    /// Versions more recent than the given application version label.
    pub async fn find_versions_since_label(
        &self,
        doc_ref: &str,
        label: &str,
    ) -> Result<Vec<DocumentVersion>, CoreError> {
        require_non_empty("doc_ref", doc_ref)?;
        require_non_empty("label", label)?;
        let filter = QueryFilter::new()
            .with(Filter::eq("ref", doc_ref))
            .with(Filter::greater_than("versionLabel", label));
        self.run(&filter).await
    }

    /// Versions more recent than the given raw store version number.
    pub async fn find_versions_since_cmis_version(
        &self,
        doc_ref: &str,
        cmis_label: &str,
    ) -> Result<Vec<DocumentVersion>, CoreError> {
        require_non_empty("doc_ref", doc_ref)?;
        require_non_empty("cmis_label", cmis_label)?;
        let filter = QueryFilter::new()
            .with(Filter::eq("ref", doc_ref))
            .with(Filter::greater_than("cmisVersionLabel", cmis_label));
        self.run(&filter).await
    }

    async fn run(&self, filter: &QueryFilter) -> Result<Vec<DocumentVersion>, CoreError> {
        let statement = statement(filter)?;
        tracing::debug!(%statement, "Querying document store");
        self.backend.query(&statement).await
    }
}

/// Compose the full statement, omitting `WHERE` for an empty predicate.
fn statement(filter: &QueryFilter) -> Result<String, CoreError> {
    let predicate = filter.render()?;
    if predicate.is_empty() {
        Ok(SELECT_VERSIONS.to_string())
    } else {
        Ok(format!("{SELECT_VERSIONS} WHERE {predicate}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_type_codes() {
        assert_eq!(VersionType::Minor.code(), 0);
        assert_eq!(VersionType::Intermediate.code(), 1);
        assert_eq!(VersionType::Major.code(), 2);
    }

    #[test]
    fn test_statement_omits_where_for_empty_filter() {
        let stmt = statement(&QueryFilter::new()).unwrap();
        assert_eq!(stmt, "SELECT * FROM leos:document");
    }
}
