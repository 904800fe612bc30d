use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use paperflow_core::domain::annotation::{Comment, CommentId};
use paperflow_core::domain::approval::ApprovalId;
use paperflow_core::domain::document::DocumentId;

use super::{parse_timestamp, RepositoryError};

fn row_to_comment(row: &SqliteRow) -> Result<Comment, RepositoryError> {
    Ok(Comment {
        id: CommentId(row.try_get("id")?),
        document_id: row.try_get::<Option<i64>, _>("document_id")?.map(DocumentId),
        approval_id: row.try_get::<Option<i64>, _>("approval_id")?.map(ApprovalId),
        content: row.try_get("content")?,
        created_at: parse_timestamp("created_at", &row.try_get::<String, _>("created_at")?)?,
    })
}

pub async fn create_comment(
    conn: &mut SqliteConnection,
    content: &str,
    document_id: Option<DocumentId>,
    approval_id: Option<ApprovalId>,
) -> Result<Comment, RepositoryError> {
    let result = sqlx::query(
        "INSERT INTO comment (document_id, approval_id, content, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(document_id.map(|id| id.0))
    .bind(approval_id.map(|id| id.0))
    .bind(content)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();
    let row = sqlx::query(
        "SELECT id, document_id, approval_id, content, created_at FROM comment WHERE id = ?",
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    row_to_comment(&row)
}

pub async fn list_for_document(
    conn: &mut SqliteConnection,
    document_id: DocumentId,
) -> Result<Vec<Comment>, RepositoryError> {
    let rows = sqlx::query(
        "SELECT id, document_id, approval_id, content, created_at
         FROM comment WHERE document_id = ? ORDER BY id ASC",
    )
    .bind(document_id.0)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(row_to_comment).collect()
}

pub async fn list_for_approval(
    conn: &mut SqliteConnection,
    approval_id: ApprovalId,
) -> Result<Vec<Comment>, RepositoryError> {
    let rows = sqlx::query(
        "SELECT id, document_id, approval_id, content, created_at
         FROM comment WHERE approval_id = ? ORDER BY id ASC",
    )
    .bind(approval_id.0)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(row_to_comment).collect()
}
