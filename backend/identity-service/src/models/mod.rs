/// Data models for identity and authentication
pub mod session;
pub mod user;

pub use session::{AuthState, Session};
pub use user::{User, UserRecord};
