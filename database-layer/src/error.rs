use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
