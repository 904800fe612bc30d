use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use paperflow_core::domain::annotation::{RiceScore, RiceScoreId};
use paperflow_core::domain::approval::UserId;
use paperflow_core::domain::document::DocumentId;

use super::RepositoryError;

fn row_to_score(row: &SqliteRow) -> Result<RiceScore, RepositoryError> {
    Ok(RiceScore {
        id: RiceScoreId(row.try_get("id")?),
        document_id: DocumentId(row.try_get("document_id")?),
        author_id: UserId(row.try_get("author_id")?),
        reach: row.try_get("reach")?,
        impact: row.try_get("impact")?,
        confidence: row.try_get("confidence")?,
        effort: row.try_get("effort")?,
        score: row.try_get("score")?,
    })
}

#[allow(clippy::too_many_arguments)]
pub async fn create_score(
    conn: &mut SqliteConnection,
    document_id: DocumentId,
    author_id: UserId,
    reach: f64,
    impact: f64,
    confidence: f64,
    effort: f64,
    score: f64,
) -> Result<RiceScore, RepositoryError> {
    let result = sqlx::query(
        "INSERT INTO rice_score (document_id, author_id, reach, impact, confidence, effort, score)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(document_id.0)
    .bind(author_id.0)
    .bind(reach)
    .bind(impact)
    .bind(confidence)
    .bind(effort)
    .bind(score)
    .execute(&mut *conn)
    .await?;

    get_score(conn, RiceScoreId(result.last_insert_rowid())).await?.ok_or_else(|| {
        RepositoryError::Decode("rice score missing after insert".to_string())
    })
}

pub async fn get_score(
    conn: &mut SqliteConnection,
    id: RiceScoreId,
) -> Result<Option<RiceScore>, RepositoryError> {
    let row = sqlx::query(
        "SELECT id, document_id, author_id, reach, impact, confidence, effort, score
         FROM rice_score WHERE id = ?",
    )
    .bind(id.0)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some(ref r) => Ok(Some(row_to_score(r)?)),
        None => Ok(None),
    }
}

pub async fn update_score(
    conn: &mut SqliteConnection,
    id: RiceScoreId,
    reach: f64,
    impact: f64,
    confidence: f64,
    effort: f64,
    score: f64,
) -> Result<RiceScore, RepositoryError> {
    sqlx::query(
        "UPDATE rice_score SET reach = ?, impact = ?, confidence = ?, effort = ?, score = ?
         WHERE id = ?",
    )
    .bind(reach)
    .bind(impact)
    .bind(confidence)
    .bind(effort)
    .bind(score)
    .bind(id.0)
    .execute(&mut *conn)
    .await?;

    get_score(conn, id)
        .await?
        .ok_or_else(|| RepositoryError::Decode(format!("rice score {} missing after update", id.0)))
}

pub async fn list_for_document(
    conn: &mut SqliteConnection,
    document_id: DocumentId,
) -> Result<Vec<RiceScore>, RepositoryError> {
    let rows = sqlx::query(
        "SELECT id, document_id, author_id, reach, impact, confidence, effort, score
         FROM rice_score WHERE document_id = ? ORDER BY id ASC",
    )
    .bind(document_id.0)
    .fetch_all(&mut *conn)
    .await?;

    rows.iter().map(row_to_score).collect()
}
