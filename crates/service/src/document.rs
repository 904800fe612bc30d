use tracing::{debug, info};

use paperflow_core::domain::document::{Document, DocumentId, DocumentStatus};
use paperflow_core::workflow::transitions::document_transition_allowed;
use paperflow_db::repositories::document as documents;
use paperflow_db::DbPool;

use crate::errors::ServiceError;

/// Document lifecycle outside the approval flow: drafting, archival, and
/// restoring a canceled document back to draft.
pub struct DocumentService {
    pool: DbPool,
}

impl DocumentService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create_draft(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Document>, ServiceError> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;
        let document = documents::create_document(&mut tx, title, description).await?;
        tx.commit().await?;

        info!(
            event_name = "document.draft_created",
            document_id = document.id.0,
            "document draft created"
        );
        Ok(Some(document))
    }

    /// Title and description are editable only while the document is in
    /// Draft or RevisionRequired; everything else is frozen content under
    /// review or already decided.
    pub async fn update_draft(
        &self,
        document_id: DocumentId,
        title: &str,
        description: Option<&str>,
    ) -> Result<Option<Document>, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let Some(document) = documents::get_document(&mut tx, document_id).await? else {
            return Ok(None);
        };
        if document.is_archived {
            return Ok(None);
        }
        if !matches!(document.status, DocumentStatus::Draft | DocumentStatus::RevisionRequired) {
            debug!(
                event_name = "document.update_denied",
                reason = "not_editable",
                document_id = document_id.0,
                status = document.status.as_str(),
                "document update denied"
            );
            return Ok(None);
        }

        let updated = documents::update_document(&mut tx, document_id, title, description).await?;
        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Archived documents read as absent.
    pub async fn get_document(
        &self,
        document_id: DocumentId,
    ) -> Result<Option<Document>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        match documents::get_document(&mut conn, document_id).await? {
            Some(document) if !document.is_archived => Ok(Some(document)),
            _ => Ok(None),
        }
    }

    pub async fn list_documents(&self) -> Result<Vec<Document>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        Ok(documents::list_documents(&mut conn).await?)
    }

    /// Archival is terminal and idempotent; archiving an archived document
    /// just returns it.
    pub async fn archive_document(
        &self,
        document_id: DocumentId,
    ) -> Result<Option<Document>, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let Some(document) = documents::get_document(&mut tx, document_id).await? else {
            return Ok(None);
        };
        if document.is_archived {
            return Ok(Some(document));
        }

        let archived = documents::archive_document(&mut tx, document_id).await?;
        tx.commit().await?;

        info!(
            event_name = "document.archived",
            document_id = document_id.0,
            "document archived"
        );
        Ok(Some(archived))
    }

    /// Canceled -> Draft, the only edge out of Canceled.
    pub async fn restore_from_canceled(
        &self,
        document_id: DocumentId,
    ) -> Result<Option<Document>, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let Some(document) = documents::get_document(&mut tx, document_id).await? else {
            return Ok(None);
        };
        if document.is_archived || document.status != DocumentStatus::Canceled {
            return Ok(None);
        }
        if !document_transition_allowed(document.status, DocumentStatus::Draft) {
            return Ok(None);
        }

        documents::set_status(&mut tx, document_id, DocumentStatus::Draft).await?;
        let restored = documents::get_document(&mut tx, document_id).await?;
        tx.commit().await?;

        info!(
            event_name = "document.restored_to_draft",
            document_id = document_id.0,
            "canceled document restored to draft"
        );
        Ok(restored)
    }
}
