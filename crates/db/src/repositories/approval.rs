use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use paperflow_core::domain::approval::{
    Approval, ApprovalId, ApprovalStatus, ApprovalStep, StepId, StepStatus, UserId,
};
use paperflow_core::domain::document::{Document, DocumentId};

use super::document::row_to_document;
use super::{parse_timestamp, RepositoryError};

fn row_to_approval(row: &SqliteRow) -> Result<Approval, RepositoryError> {
    let status_str: String = row.try_get("status")?;
    let status = ApprovalStatus::parse(&status_str).ok_or_else(|| {
        RepositoryError::Decode(format!("unknown approval status `{status_str}`"))
    })?;

    Ok(Approval {
        id: ApprovalId(row.try_get("id")?),
        document_id: DocumentId(row.try_get("document_id")?),
        status,
        created_at: parse_timestamp("created_at", &row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_timestamp("updated_at", &row.try_get::<String, _>("updated_at")?)?,
    })
}

fn row_to_step(row: &SqliteRow) -> Result<ApprovalStep, RepositoryError> {
    let status_str: String = row.try_get("status")?;
    let status = StepStatus::parse(&status_str)
        .ok_or_else(|| RepositoryError::Decode(format!("unknown step status `{status_str}`")))?;

    Ok(ApprovalStep {
        id: StepId(row.try_get("id")?),
        approval_id: ApprovalId(row.try_get("approval_id")?),
        approver_id: UserId(row.try_get("approver_id")?),
        status,
        rejection_reason: row.try_get("rejection_reason")?,
        created_at: parse_timestamp("created_at", &row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_timestamp("updated_at", &row.try_get::<String, _>("updated_at")?)?,
    })
}

pub async fn get_approval(
    conn: &mut SqliteConnection,
    id: ApprovalId,
) -> Result<Option<Approval>, RepositoryError> {
    let row = sqlx::query(
        "SELECT id, document_id, status, created_at, updated_at FROM approval WHERE id = ?",
    )
    .bind(id.0)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(ref r) => Ok(Some(row_to_approval(r)?)),
        None => Ok(None),
    }
}

/// Most recent approval for a document. A resubmission after revision
/// creates a new row, so descending id picks the active cycle.
pub async fn get_by_document_id(
    conn: &mut SqliteConnection,
    document_id: DocumentId,
) -> Result<Option<Approval>, RepositoryError> {
    let row = sqlx::query(
        "SELECT id, document_id, status, created_at, updated_at
         FROM approval WHERE document_id = ? ORDER BY id DESC LIMIT 1",
    )
    .bind(document_id.0)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(ref r) => Ok(Some(row_to_approval(r)?)),
        None => Ok(None),
    }
}

pub async fn create_approval(
    conn: &mut SqliteConnection,
    document_id: DocumentId,
    status: ApprovalStatus,
) -> Result<Approval, RepositoryError> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        "INSERT INTO approval (document_id, status, created_at, updated_at) VALUES (?, ?, ?, ?)",
    )
    .bind(document_id.0)
    .bind(status.as_str())
    .bind(&now)
    .bind(&now)
    .execute(&mut *conn)
    .await?;

    let id = ApprovalId(result.last_insert_rowid());
    get_approval(conn, id).await?.ok_or_else(|| {
        RepositoryError::Decode(format!("approval {} missing after insert", id.0))
    })
}

pub async fn create_step(
    conn: &mut SqliteConnection,
    approval_id: ApprovalId,
    approver_id: UserId,
    status: StepStatus,
) -> Result<ApprovalStep, RepositoryError> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        "INSERT INTO approval_step (approval_id, approver_id, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(approval_id.0)
    .bind(approver_id.0)
    .bind(status.as_str())
    .bind(&now)
    .bind(&now)
    .execute(&mut *conn)
    .await?;

    let id = StepId(result.last_insert_rowid());
    get_step(conn, id)
        .await?
        .ok_or_else(|| RepositoryError::Decode(format!("step {} missing after insert", id.0)))
}

pub async fn get_step(
    conn: &mut SqliteConnection,
    id: StepId,
) -> Result<Option<ApprovalStep>, RepositoryError> {
    let row = sqlx::query(
        "SELECT id, approval_id, approver_id, status, rejection_reason, created_at, updated_at
         FROM approval_step WHERE id = ?",
    )
    .bind(id.0)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(ref r) => Ok(Some(row_to_step(r)?)),
        None => Ok(None),
    }
}

/// Steps in creation order, which is the approver submission order.
pub async fn list_steps(
    conn: &mut SqliteConnection,
    approval_id: ApprovalId,
) -> Result<Vec<ApprovalStep>, RepositoryError> {
    let rows = sqlx::query(
        "SELECT id, approval_id, approver_id, status, rejection_reason, created_at, updated_at
         FROM approval_step WHERE approval_id = ? ORDER BY id ASC",
    )
    .bind(approval_id.0)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(row_to_step).collect()
}

pub async fn set_approval_status(
    conn: &mut SqliteConnection,
    id: ApprovalId,
    status: ApprovalStatus,
) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE approval SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(id.0)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

/// Resolve a step. Approval clears any earlier rejection reason; rejection
/// records one.
pub async fn set_step_status(
    conn: &mut SqliteConnection,
    id: StepId,
    status: StepStatus,
    rejection_reason: Option<&str>,
) -> Result<ApprovalStep, RepositoryError> {
    sqlx::query(
        "UPDATE approval_step SET status = ?, rejection_reason = ?, updated_at = ? WHERE id = ?",
    )
    .bind(status.as_str())
    .bind(rejection_reason)
    .bind(Utc::now().to_rfc3339())
    .bind(id.0)
    .execute(&mut *conn)
    .await?;

    get_step(conn, id)
        .await?
        .ok_or_else(|| RepositoryError::Decode(format!("step {} missing after update", id.0)))
}

/// Active documents that still have a pending step assigned to the approver.
pub async fn list_documents_for_approver(
    conn: &mut SqliteConnection,
    approver_id: UserId,
) -> Result<Vec<Document>, RepositoryError> {
    let rows = sqlx::query(
        "SELECT DISTINCT d.id, d.title, d.description, d.status, d.is_archived,
                d.created_at, d.updated_at
         FROM document d
         JOIN approval a ON a.document_id = d.id
         JOIN approval_step s ON s.approval_id = a.id
         WHERE s.approver_id = ? AND s.status = 'PENDING' AND d.is_archived = 0
         ORDER BY d.id ASC",
    )
    .bind(approver_id.0)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(row_to_document).collect()
}
