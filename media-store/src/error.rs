use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type MediaResult<T> = Result<T, MediaError>;
