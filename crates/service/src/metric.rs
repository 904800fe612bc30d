use sqlx::SqliteConnection;

use paperflow_core::domain::annotation::{DocumentMetric, MetricId};
use paperflow_core::domain::document::{Document, DocumentId, DocumentStatus};
use paperflow_db::repositories::{document as documents, metric as metrics};
use paperflow_db::DbPool;

use crate::errors::ServiceError;

/// Named metrics on a document. Mutable only while the document is still
/// in play: archived or approved documents reject all metric changes.
pub struct MetricService {
    pool: DbPool,
}

impl MetricService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn add_metric(
        &self,
        document_id: DocumentId,
        name: &str,
        value: &str,
        unit: &str,
    ) -> Result<Option<DocumentMetric>, ServiceError> {
        if name.trim().is_empty() || value.trim().is_empty() || unit.trim().is_empty() {
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;
        if mutable_document(&mut tx, document_id).await?.is_none() {
            return Ok(None);
        }

        let metric = metrics::create_metric(&mut tx, document_id, name, value, unit).await?;
        tx.commit().await?;
        Ok(Some(metric))
    }

    pub async fn update_metric(
        &self,
        document_id: DocumentId,
        metric_id: MetricId,
        name: &str,
        value: &str,
        unit: &str,
    ) -> Result<Option<DocumentMetric>, ServiceError> {
        if name.trim().is_empty() || value.trim().is_empty() || unit.trim().is_empty() {
            return Ok(None);
        }

        let mut tx = self.pool.begin().await?;
        if mutable_document(&mut tx, document_id).await?.is_none() {
            return Ok(None);
        }
        let Some(metric) = metrics::get_metric(&mut tx, metric_id).await? else {
            return Ok(None);
        };
        if metric.document_id != document_id {
            return Ok(None);
        }

        let updated = metrics::update_metric(&mut tx, metric_id, name, value, unit).await?;
        tx.commit().await?;
        Ok(Some(updated))
    }

    pub async fn delete_metric(
        &self,
        document_id: DocumentId,
        metric_id: MetricId,
    ) -> Result<bool, ServiceError> {
        let mut tx = self.pool.begin().await?;
        if mutable_document(&mut tx, document_id).await?.is_none() {
            return Ok(false);
        }
        let Some(metric) = metrics::get_metric(&mut tx, metric_id).await? else {
            return Ok(false);
        };
        if metric.document_id != document_id {
            return Ok(false);
        }

        metrics::delete_metric(&mut tx, metric_id).await?;
        tx.commit().await?;
        Ok(true)
    }

    pub async fn list_for_document(
        &self,
        document_id: DocumentId,
    ) -> Result<Vec<DocumentMetric>, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        Ok(metrics::list_for_document(&mut conn, document_id).await?)
    }
}

/// A document whose metrics may still change: present, not archived, not
/// yet approved.
async fn mutable_document(
    conn: &mut SqliteConnection,
    document_id: DocumentId,
) -> Result<Option<Document>, ServiceError> {
    match documents::get_document(conn, document_id).await? {
        Some(document)
            if !document.is_archived && document.status != DocumentStatus::Approved =>
        {
            Ok(Some(document))
        }
        _ => Ok(None),
    }
}
