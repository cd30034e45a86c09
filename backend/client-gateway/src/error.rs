//! Errors as the screens present them
//!
//! Local validation messages are shown verbatim, rejected requests get a
//! short explanation, and every remote failure collapses into [`UserFacingError::Retry`]
//! after being logged where it happened.

use content_service::ContentError;
use feed_service::FeedError;
use graph_service::GraphError;
use identity_service::IdentityError;
use thiserror::Error;
use tracing::error;

pub const RETRY_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserFacingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Rejected(String),

    #[error("Something went wrong. Please try again.")]
    Retry,
}

impl UserFacingError {
    pub fn signed_out() -> Self {
        UserFacingError::Rejected("Please sign in first".to_string())
    }

    fn retry(operation: &'static str, err: &dyn std::error::Error) -> Self {
        error!(operation, error = %err, "Operation failed");
        UserFacingError::Retry
    }
}

/// Convert a service error, logging the ones that end up as `Retry`
pub trait IntoUserFacing {
    fn user_facing(self, operation: &'static str) -> UserFacingError;
}

impl IntoUserFacing for IdentityError {
    fn user_facing(self, operation: &'static str) -> UserFacingError {
        match self {
            IdentityError::MissingField(_) => {
                UserFacingError::Validation("Please fill in all fields".to_string())
            }
            IdentityError::InvalidEmail(_) => {
                UserFacingError::Validation("Please enter a valid email address".to_string())
            }
            IdentityError::WeakPassword(msg) | IdentityError::Validation(msg) => {
                UserFacingError::Validation(msg)
            }
            IdentityError::InvalidCredentials => {
                UserFacingError::Rejected("Invalid email or password".to_string())
            }
            IdentityError::AlreadyExists => {
                UserFacingError::Rejected("An account with this email already exists".to_string())
            }
            IdentityError::UserNotFound => UserFacingError::Rejected("User not found".to_string()),
            other => UserFacingError::retry(operation, &other),
        }
    }
}

impl IntoUserFacing for GraphError {
    fn user_facing(self, operation: &'static str) -> UserFacingError {
        match self {
            GraphError::SelfFollow => {
                UserFacingError::Rejected("You cannot follow yourself".to_string())
            }
            other => UserFacingError::retry(operation, &other),
        }
    }
}

impl IntoUserFacing for ContentError {
    fn user_facing(self, operation: &'static str) -> UserFacingError {
        match self {
            ContentError::MissingField(_) => UserFacingError::Validation(
                "Please choose an image and enter a caption".to_string(),
            ),
            other => UserFacingError::retry(operation, &other),
        }
    }
}

impl IntoUserFacing for FeedError {
    fn user_facing(self, operation: &'static str) -> UserFacingError {
        UserFacingError::retry(operation, &self)
    }
}
