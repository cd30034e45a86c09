/// Credential records held by the authentication backend
use id_types::UserId;
use serde::{Deserialize, Serialize};

/// Keyed by normalized email so that creation is a conditional insert
pub const CREDENTIALS_COLLECTION: &str = "credentials";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub user_id: UserId,
    pub email: String,
    pub password_hash: String,
}
