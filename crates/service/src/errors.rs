use thiserror::Error;

use paperflow_db::RepositoryError;

/// Infrastructure-level failures only. Domain-rule denials never show up
/// here; they are the `None` arm of each operation's return value.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
