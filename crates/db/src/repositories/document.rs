use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use paperflow_core::domain::document::{Document, DocumentId, DocumentStatus};

use super::{parse_timestamp, RepositoryError};

pub(crate) fn row_to_document(row: &SqliteRow) -> Result<Document, RepositoryError> {
    let status_str: String = row.try_get("status")?;
    let status = DocumentStatus::parse(&status_str).ok_or_else(|| {
        RepositoryError::Decode(format!("unknown document status `{status_str}`"))
    })?;

    Ok(Document {
        id: DocumentId(row.try_get("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status,
        is_archived: row.try_get("is_archived")?,
        created_at: parse_timestamp("created_at", &row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_timestamp("updated_at", &row.try_get::<String, _>("updated_at")?)?,
    })
}

pub async fn get_document(
    conn: &mut SqliteConnection,
    id: DocumentId,
) -> Result<Option<Document>, RepositoryError> {
    let row = sqlx::query(
        "SELECT id, title, description, status, is_archived, created_at, updated_at
         FROM document WHERE id = ?",
    )
    .bind(id.0)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(ref r) => Ok(Some(row_to_document(r)?)),
        None => Ok(None),
    }
}

/// Active (non-archived) documents, newest first.
pub async fn list_documents(
    conn: &mut SqliteConnection,
) -> Result<Vec<Document>, RepositoryError> {
    let rows = sqlx::query(
        "SELECT id, title, description, status, is_archived, created_at, updated_at
         FROM document WHERE is_archived = 0 ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(row_to_document).collect()
}

pub async fn create_document(
    conn: &mut SqliteConnection,
    title: &str,
    description: Option<&str>,
) -> Result<Document, RepositoryError> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        "INSERT INTO document (title, description, status, is_archived, created_at, updated_at)
         VALUES (?, ?, ?, 0, ?, ?)",
    )
    .bind(title)
    .bind(description)
    .bind(DocumentStatus::Draft.as_str())
    .bind(&now)
    .bind(&now)
    .execute(&mut *conn)
    .await?;

    let id = DocumentId(result.last_insert_rowid());
    get_document(conn, id).await?.ok_or_else(|| {
        RepositoryError::Decode(format!("document {} missing after insert", id.0))
    })
}

pub async fn update_document(
    conn: &mut SqliteConnection,
    id: DocumentId,
    title: &str,
    description: Option<&str>,
) -> Result<Document, RepositoryError> {
    sqlx::query("UPDATE document SET title = ?, description = ?, updated_at = ? WHERE id = ?")
        .bind(title)
        .bind(description)
        .bind(Utc::now().to_rfc3339())
        .bind(id.0)
        .execute(&mut *conn)
        .await?;

    get_document(conn, id).await?.ok_or_else(|| {
        RepositoryError::Decode(format!("document {} missing after update", id.0))
    })
}

pub async fn set_status(
    conn: &mut SqliteConnection,
    id: DocumentId,
    status: DocumentStatus,
) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE document SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(id.0)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn archive_document(
    conn: &mut SqliteConnection,
    id: DocumentId,
) -> Result<Document, RepositoryError> {
    sqlx::query("UPDATE document SET is_archived = 1, updated_at = ? WHERE id = ?")
        .bind(Utc::now().to_rfc3339())
        .bind(id.0)
        .execute(&mut *conn)
        .await?;

    get_document(conn, id).await?.ok_or_else(|| {
        RepositoryError::Decode(format!("document {} missing after archive", id.0))
    })
}

#[cfg(test)]
mod tests {
    use paperflow_core::domain::document::DocumentStatus;

    use super::*;
    use crate::{connect_with_settings, migrations};

    async fn setup() -> crate::DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    #[tokio::test]
    async fn create_and_fetch_document() {
        let pool = setup().await;
        let mut conn = pool.acquire().await.expect("acquire");

        let created = create_document(&mut conn, "Q3 launch plan", Some("rollout steps"))
            .await
            .expect("create");
        assert_eq!(created.status, DocumentStatus::Draft);
        assert!(!created.is_archived);

        let fetched = get_document(&mut conn, created.id).await.expect("fetch");
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn list_documents_skips_archived() {
        let pool = setup().await;
        let mut conn = pool.acquire().await.expect("acquire");

        let keep = create_document(&mut conn, "keep", None).await.expect("create");
        let archived = create_document(&mut conn, "archive me", None).await.expect("create");
        archive_document(&mut conn, archived.id).await.expect("archive");

        let documents = list_documents(&mut conn).await.expect("list");
        assert_eq!(documents.iter().map(|d| d.id).collect::<Vec<_>>(), vec![keep.id]);
    }

    #[tokio::test]
    async fn set_status_persists_the_wire_string() {
        let pool = setup().await;
        let mut conn = pool.acquire().await.expect("acquire");

        let document = create_document(&mut conn, "doc", None).await.expect("create");
        set_status(&mut conn, document.id, DocumentStatus::Approval).await.expect("set status");

        let fetched = get_document(&mut conn, document.id).await.expect("fetch").expect("exists");
        assert_eq!(fetched.status, DocumentStatus::Approval);
    }
}
