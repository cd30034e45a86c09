//! Input validation utilities for identity service
//!
//! Everything here runs before any remote call so that form errors are
//! reported immediately.

use crate::error::{IdentityError, Result};
use validator::{Validate, ValidateEmail};

/// Longest username accepted at sign-up or rename, in characters
pub const MAX_USERNAME_LENGTH: usize = 64;

/// Sign-up form, validated field by field
#[derive(Debug, Clone, Validate)]
pub struct SignUpRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 64))]
    pub username: String,
}

impl SignUpRequest {
    pub fn new(email: &str, password: &str, username: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
            username: username.trim().to_string(),
        }
    }

    /// Check presence, shape and password length
    pub fn check(&self, min_password_length: usize) -> Result<()> {
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("username", &self.username)?;
        self.validate()?;
        if self.password.chars().count() < min_password_length {
            return Err(IdentityError::WeakPassword(format!(
                "Password must be at least {} characters",
                min_password_length
            )));
        }
        Ok(())
    }
}

/// Fail with `MissingField` when a form field is blank
pub fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(IdentityError::MissingField(field));
    }
    Ok(())
}

/// Username must be present and at most [`MAX_USERNAME_LENGTH`] characters
pub fn check_username(username: &str) -> Result<()> {
    require("username", username)?;
    if username.trim().chars().count() > MAX_USERNAME_LENGTH {
        return Err(username_too_long());
    }
    Ok(())
}

pub(crate) fn username_too_long() -> IdentityError {
    IdentityError::Validation(format!(
        "Username must be at most {} characters",
        MAX_USERNAME_LENGTH
    ))
}

/// Validate email format
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && email.validate_email()
}

/// Canonical form used to key credentials
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
