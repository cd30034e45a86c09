/// Error types for graph-service
use doc_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Cannot follow self")]
    SelfFollow,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Write failed: {0}")]
    Write(#[source] StoreError),

    #[error("Read failed: {0}")]
    Read(#[source] StoreError),
}

impl GraphError {
    pub fn from_write(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => GraphError::Network(msg),
            other => GraphError::Write(other),
        }
    }

    pub fn from_read(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => GraphError::Network(msg),
            other => GraphError::Read(other),
        }
    }
}

/// Result type alias for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;
