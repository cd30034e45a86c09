/// Security module for authentication
///
/// Provides core security primitives for identity-service:
/// - Password hashing and verification (Argon2id)
pub mod password;

pub use password::{hash_password, verify_password};
