use chrono::{DateTime, Utc};
use id_types::UserId;
use serde::{Deserialize, Serialize};

/// Authenticated session, held in memory between sign-in and sign-out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            signed_in_at: Utc::now(),
        }
    }
}

/// Observable authentication state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthState {
    SignedIn(Session),
    SignedOut,
}

impl AuthState {
    pub fn from_session(session: Option<Session>) -> Self {
        match session {
            Some(session) => AuthState::SignedIn(session),
            None => AuthState::SignedOut,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            AuthState::SignedIn(session) => Some(&session.user_id),
            AuthState::SignedOut => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthState::SignedIn(_))
    }
}
