/// Error types for Content Service
use doc_store::StoreError;
use thiserror::Error;

/// Result type for content-service operations
pub type Result<T> = std::result::Result<T, ContentError>;

#[derive(Debug, Error)]
pub enum ContentError {
    /// Caption or image missing from a new post
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Write failed: {0}")]
    Write(#[source] StoreError),

    #[error("Read failed: {0}")]
    Read(#[source] StoreError),
}

impl ContentError {
    pub fn from_write(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => ContentError::Network(msg),
            other => ContentError::Write(other),
        }
    }

    pub fn from_read(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => ContentError::Network(msg),
            other => ContentError::Read(other),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ContentError::MissingField(_))
    }
}
