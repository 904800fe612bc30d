use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use paperflow_core::domain::annotation::{DocumentMetric, MetricId};
use paperflow_core::domain::document::DocumentId;

use super::RepositoryError;

fn row_to_metric(row: &SqliteRow) -> Result<DocumentMetric, RepositoryError> {
    Ok(DocumentMetric {
        id: MetricId(row.try_get("id")?),
        document_id: DocumentId(row.try_get("document_id")?),
        name: row.try_get("name")?,
        value: row.try_get("value")?,
        unit: row.try_get("unit")?,
    })
}

pub async fn create_metric(
    conn: &mut SqliteConnection,
    document_id: DocumentId,
    name: &str,
    value: &str,
    unit: &str,
) -> Result<DocumentMetric, RepositoryError> {
    let result = sqlx::query(
        "INSERT INTO document_metric (document_id, name, value, unit) VALUES (?, ?, ?, ?)",
    )
    .bind(document_id.0)
    .bind(name)
    .bind(value)
    .bind(unit)
    .execute(&mut *conn)
    .await?;

    get_metric(conn, MetricId(result.last_insert_rowid())).await?.ok_or_else(|| {
        RepositoryError::Decode("metric missing after insert".to_string())
    })
}

pub async fn get_metric(
    conn: &mut SqliteConnection,
    id: MetricId,
) -> Result<Option<DocumentMetric>, RepositoryError> {
    let row =
        sqlx::query("SELECT id, document_id, name, value, unit FROM document_metric WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&mut *conn)
            .await?;

    match row {
        Some(ref r) => Ok(Some(row_to_metric(r)?)),
        None => Ok(None),
    }
}

pub async fn update_metric(
    conn: &mut SqliteConnection,
    id: MetricId,
    name: &str,
    value: &str,
    unit: &str,
) -> Result<DocumentMetric, RepositoryError> {
    sqlx::query("UPDATE document_metric SET name = ?, value = ?, unit = ? WHERE id = ?")
        .bind(name)
        .bind(value)
        .bind(unit)
        .bind(id.0)
        .execute(&mut *conn)
        .await?;

    get_metric(conn, id)
        .await?
        .ok_or_else(|| RepositoryError::Decode(format!("metric {} missing after update", id.0)))
}

pub async fn delete_metric(
    conn: &mut SqliteConnection,
    id: MetricId,
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM document_metric WHERE id = ?")
        .bind(id.0)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

pub async fn list_for_document(
    conn: &mut SqliteConnection,
    document_id: DocumentId,
) -> Result<Vec<DocumentMetric>, RepositoryError> {
    let rows = sqlx::query(
        "SELECT id, document_id, name, value, unit
         FROM document_metric WHERE document_id = ? ORDER BY id ASC",
    )
    .bind(document_id.0)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(row_to_metric).collect()
}
