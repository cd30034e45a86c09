//! Identifier types shared by every service
//!
//! Ids are opaque strings issued by the service that owns the record. New ids
//! are generated as lowercase hyphenated UUID v4 text, but callers must never
//! rely on that shape: anything non-empty without a `/` is a valid id.
//!
//! ```
//! use id_types::{parse_user_id, UserId};
//!
//! let id = parse_user_id("a1", "viewer_id").unwrap();
//! assert_eq!(id.as_str(), "a1");
//!
//! let err = parse_user_id("", "viewer_id").unwrap_err();
//! assert!(err.to_string().contains("viewer_id"));
//! # let _ = UserId::generate();
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for id parsing failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("Invalid id for field '{field}': {details}")]
    InvalidFormat { field: String, details: String },

    #[error("Missing required id field: {field}")]
    MissingField { field: String },
}

fn check_id(input: &str, field: &str) -> Result<(), IdError> {
    if input.is_empty() {
        return Err(IdError::MissingField {
            field: field.to_string(),
        });
    }
    // Ids are used as path segments of sub-collections
    if input.contains('/') {
        return Err(IdError::InvalidFormat {
            field: field.to_string(),
            details: "ids must not contain '/'".to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// Id Newtypes
// ============================================================================

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random id
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Parse an id, naming `field` in the error
            pub fn parse(input: &str, field: &str) -> Result<Self, IdError> {
                check_id(input, field)?;
                Ok(Self(input.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Id of a user record, issued by the identity service at sign-up
    UserId
);

opaque_id!(
    /// Id of a post, issued by the content store on creation
    PostId
);

// ============================================================================
// Core Parsing Functions
// ============================================================================

/// Parse a user id from string with field name for error context
pub fn parse_user_id(input: &str, field: &str) -> Result<UserId, IdError> {
    UserId::parse(input, field)
}

/// Parse a post id from string with field name for error context
pub fn parse_post_id(input: &str, field: &str) -> Result<PostId, IdError> {
    PostId::parse(input, field)
}

/// Parse an optional user id (returns None if input is blank)
pub fn parse_user_id_opt(input: &str, field: &str) -> Result<Option<UserId>, IdError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_user_id(input, field).map(Some)
}

/// Parse a list of user ids
pub fn parse_user_id_vec(inputs: &[String], field: &str) -> Result<Vec<UserId>, IdError> {
    inputs
        .iter()
        .enumerate()
        .map(|(i, s)| parse_user_id(s, &format!("{}[{}]", field, i)))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
