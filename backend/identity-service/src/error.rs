use doc_store::StoreError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IdentityError>;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already exists")]
    AlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Write failed: {0}")]
    Write(#[source] StoreError),

    #[error("Read failed: {0}")]
    Read(#[source] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Map a failed store write, keeping connectivity failures distinguishable
    pub fn from_write(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => IdentityError::Network(msg),
            StoreError::AlreadyExists { .. } => IdentityError::AlreadyExists,
            other => IdentityError::Write(other),
        }
    }

    /// Map a failed store read
    pub fn from_read(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => IdentityError::Network(msg),
            other => IdentityError::Read(other),
        }
    }

    /// Failures detected locally, before any remote call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            IdentityError::MissingField(_)
                | IdentityError::InvalidEmail(_)
                | IdentityError::WeakPassword(_)
                | IdentityError::Validation(_)
        )
    }
}

impl From<validator::ValidationErrors> for IdentityError {
    fn from(err: validator::ValidationErrors) -> Self {
        let fields = err.field_errors();
        if fields.contains_key("email") {
            IdentityError::InvalidEmail("malformed address".to_string())
        } else if fields.contains_key("username") {
            crate::validators::username_too_long()
        } else {
            IdentityError::Validation(err.to_string())
        }
    }
}
