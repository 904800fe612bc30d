//! Row-level persistence for the workflow entities.
//!
//! Every function takes a `&mut SqliteConnection` rather than the pool so
//! the service layer can compose several of them inside one transaction;
//! atomicity is decided by the caller, not here.

use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod approval;
pub mod comment;
pub mod document;
pub mod metric;
pub mod rice;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Timestamps are stored as RFC 3339 TEXT columns.
pub(crate) fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| RepositoryError::Decode(format!("bad timestamp in `{column}`: {err}")))
}
