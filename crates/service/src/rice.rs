use paperflow_core::domain::annotation::{rice_score, RiceScore, RiceScoreId};
use paperflow_core::domain::approval::UserId;
use paperflow_core::domain::document::{DocumentId, DocumentStatus};
use paperflow_db::repositories::{document as documents, rice as rices};
use paperflow_db::DbPool;

use crate::errors::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiceInput {
    pub reach: f64,
    pub impact: f64,
    pub confidence: f64,
    pub effort: f64,
}

/// RICE prioritization scores, collected from reviewers while a document
/// sits in Approval status.
pub struct RiceService {
    pool: DbPool,
}

impl RiceService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn add_score(
        &self,
        document_id: DocumentId,
        author_id: UserId,
        input: RiceInput,
    ) -> Result<Option<RiceScore>, ServiceError> {
        let Some(score) = rice_score(input.reach, input.impact, input.confidence, input.effort)
        else {
            return Ok(None);
        };

        let mut tx = self.pool.begin().await?;
        match documents::get_document(&mut tx, document_id).await? {
            Some(document)
                if !document.is_archived && document.status == DocumentStatus::Approval => {}
            _ => return Ok(None),
        }

        let created = rices::create_score(
            &mut tx,
            document_id,
            author_id,
            input.reach,
            input.impact,
            input.confidence,
            input.effort,
            score,
        )
        .await?;
        tx.commit().await?;
        Ok(Some(created))
    }

    /// Only the original author may revise their score.
    pub async fn update_score(
        &self,
        score_id: RiceScoreId,
        author_id: UserId,
        input: RiceInput,
    ) -> Result<Option<RiceScore>, ServiceError> {
        let Some(score) = rice_score(input.reach, input.impact, input.confidence, input.effort)
        else {
            return Ok(None);
        };

        let mut tx = self.pool.begin().await?;
        let Some(existing) = rices::get_score(&mut tx, score_id).await? else {
            return Ok(None);
        };
        if existing.author_id != author_id {
            return Ok(None);
        }
        match documents::get_document(&mut tx, existing.document_id).await? {
            Some(document)
                if !document.is_archived && document.status == DocumentStatus::Approval => {}
            _ => return Ok(None),
        }

        let updated = rices::update_score(
            &mut tx,
            score_id,
            input.reach,
            input.impact,
            input.confidence,
            input.effort,
            score,
        )
        .await?;
        tx.commit().await?;
        Ok(Some(updated))
    }

    pub async fn list_for_document(
        &self,
        document_id: DocumentId,
    ) -> Result<Vec<RiceScore>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        Ok(rices::list_for_document(&mut conn, document_id).await?)
    }
}
