use id_types::UserId;
use serde::{Deserialize, Serialize};

/// User profile record as stored in the `users` collection (keyed by user id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// User model - directory entry joined with its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl User {
    pub fn from_record(id: UserId, record: UserRecord) -> Self {
        Self {
            id,
            username: record.username,
            email: record.email,
        }
    }

    pub fn to_record(&self) -> UserRecord {
        UserRecord {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}
