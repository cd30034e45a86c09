/// Identity Service Library
///
/// Provides account registration, sign-in and the user directory.
///
/// ## Modules
///
/// - `config`: Service configuration
/// - `db`: Document-store repositories (users, credentials)
/// - `error`: Error types
/// - `models`: Data models
/// - `security`: Password hashing
/// - `services`: Auth backend, auth-state observation, identity gateway
/// - `validators`: Input validation
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod security;
pub mod services;
pub mod validators;

// Re-export commonly used types
pub use config::IdentityConfig;
pub use db::{DocumentUserDirectory, UserDirectory};
pub use error::{IdentityError, Result};
pub use models::{AuthState, Session, User};
pub use services::{
    AuthProvider, AuthStateChanges, AuthSubscription, IdentityGateway, StoreAuthProvider,
};
