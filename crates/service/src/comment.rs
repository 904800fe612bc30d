use paperflow_core::domain::annotation::Comment;
use paperflow_core::domain::approval::ApprovalId;
use paperflow_core::domain::document::DocumentId;
use paperflow_db::repositories::{approval as approvals, comment as comments, document as documents};
use paperflow_db::DbPool;

use crate::errors::ServiceError;

/// Comments attach to exactly one of a document or an approval.
pub struct CommentService {
    pool: DbPool,
}

impl CommentService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn add_comment(
        &self,
        content: &str,
        document_id: Option<DocumentId>,
        approval_id: Option<ApprovalId>,
    ) -> Result<Option<Comment>, ServiceError> {
        if content.trim().is_empty() {
            return Ok(None);
        }
        // exactly one target
        if document_id.is_some() == approval_id.is_some() {
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;

        if let Some(document_id) = document_id {
            match documents::get_document(&mut tx, document_id).await? {
                Some(document) if !document.is_archived => {}
                _ => return Ok(None),
            }
        }
        if let Some(approval_id) = approval_id {
            if approvals::get_approval(&mut tx, approval_id).await?.is_none() {
                return Ok(None);
            }
        }

        let comment = comments::create_comment(&mut tx, content, document_id, approval_id).await?;
        tx.commit().await?;
        Ok(Some(comment))
    }

    pub async fn list_for_document(
        &self,
        document_id: DocumentId,
    ) -> Result<Vec<Comment>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        Ok(comments::list_for_document(&mut conn, document_id).await?)
    }

    pub async fn list_for_approval(
        &self,
        approval_id: ApprovalId,
    ) -> Result<Vec<Comment>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        Ok(comments::list_for_approval(&mut conn, approval_id).await?)
    }
}
