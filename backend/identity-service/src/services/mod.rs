/// Service layer for identity-service
///
/// - Authentication backend (account creation, credential checks)
/// - Auth-state observation (streams and callback subscriptions)
/// - Identity gateway (sign-up, sign-in, sign-out, current session)
pub mod auth_provider;
pub mod auth_state;
pub mod gateway;

pub use auth_provider::{AuthProvider, StoreAuthProvider};
pub use auth_state::{AuthStateChanges, AuthSubscription};
pub use gateway::IdentityGateway;
