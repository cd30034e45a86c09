/// Persistence for identity service
pub mod credentials;
pub mod users;

// Re-export commonly used types
pub use credentials::{CredentialRecord, CREDENTIALS_COLLECTION};
pub use users::{DocumentUserDirectory, UserDirectory, USERS_COLLECTION};
