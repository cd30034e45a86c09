/// User directory operations for identity-service
use crate::error::{IdentityError, Result};
use crate::models::{User, UserRecord};
use crate::validators::check_username;
use doc_store::{prefix_upper_bound, Direction, Document, DocumentStore, Filter, Query};
use id_types::UserId;
use std::sync::Arc;
use tracing::{debug, error, warn};

pub const USERS_COLLECTION: &str = "users";

/// Directory of user profile records (uid -> {username, email})
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Create or overwrite the record for `id`
    async fn create_user(&self, id: &UserId, username: &str, email: &str) -> Result<()>;

    /// Fetch a user; `None` when no record exists
    async fn get_user(&self, id: &UserId) -> Result<Option<User>>;

    /// Users whose username starts with `prefix` (case-sensitive).
    /// An empty prefix yields no users.
    async fn search_by_username_prefix(&self, prefix: &str) -> Result<Vec<User>>;

    /// Change the username of an existing record
    async fn update_username(&self, id: &UserId, username: &str) -> Result<()>;
}

/// Document-store backed user directory
#[derive(Clone)]
pub struct DocumentUserDirectory {
    store: Arc<dyn DocumentStore>,
}

impl DocumentUserDirectory {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

fn user_from_document(doc: Document) -> Result<User> {
    let id = UserId::parse(&doc.id, "user_id")
        .map_err(|e| IdentityError::Internal(e.to_string()))?;
    let record: UserRecord = doc.to_record().map_err(IdentityError::from_read)?;
    Ok(User::from_record(id, record))
}

#[async_trait::async_trait]
impl UserDirectory for DocumentUserDirectory {
    async fn create_user(&self, id: &UserId, username: &str, email: &str) -> Result<()> {
        let record = UserRecord {
            username: username.to_string(),
            email: email.to_string(),
        };
        let doc = Document::from_record(id.as_str(), &record).map_err(IdentityError::from_write)?;

        self.store
            .set(USERS_COLLECTION, doc)
            .await
            .map_err(|e| {
                error!(user_id = %id, error = %e, "Failed to save user record");
                IdentityError::from_write(e)
            })?;

        debug!(user_id = %id, username = %username, "Saved user record");
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        let doc = self
            .store
            .get(USERS_COLLECTION, id.as_str())
            .await
            .map_err(IdentityError::from_read)?;

        match doc {
            Some(doc) => user_from_document(doc).map(Some),
            None => {
                debug!(user_id = %id, "No user record");
                Ok(None)
            }
        }
    }

    async fn search_by_username_prefix(&self, prefix: &str) -> Result<Vec<User>> {
        if prefix.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = Query::collection(USERS_COLLECTION)
            .filter(Filter::gte("username", prefix))
            .order_by("username", Direction::Ascending);
        if let Some(upper) = prefix_upper_bound(prefix) {
            query = query.filter(Filter::lt("username", upper));
        }

        let docs = self
            .store
            .query(&query)
            .await
            .map_err(IdentityError::from_read)?;

        let users: Vec<User> = docs
            .into_iter()
            .filter_map(|doc| {
                let doc_id = doc.id.clone();
                match user_from_document(doc) {
                    Ok(user) => Some(user),
                    Err(e) => {
                        warn!(doc_id = %doc_id, error = %e, "Skipping malformed user record");
                        None
                    }
                }
            })
            .collect();

        debug!(prefix = %prefix, matches = users.len(), "Username prefix search");
        Ok(users)
    }

    async fn update_username(&self, id: &UserId, username: &str) -> Result<()> {
        check_username(username)?;

        let mut user = self.get_user(id).await?.ok_or(IdentityError::UserNotFound)?;
        user.username = username.trim().to_string();

        let doc = Document::from_record(id.as_str(), &user.to_record())
            .map_err(IdentityError::from_write)?;
        self.store
            .set(USERS_COLLECTION, doc)
            .await
            .map_err(IdentityError::from_write)?;

        debug!(user_id = %id, username = %user.username, "Updated username");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_store::{InMemoryDocumentStore, StoreConfig};

    fn directory() -> DocumentUserDirectory {
        DocumentUserDirectory::new(Arc::new(InMemoryDocumentStore::new(StoreConfig::default())))
    }

    fn uid(id: &str) -> UserId {
        UserId::parse(id, "user_id").unwrap()
    }

    async fn seeded(names: &[&str]) -> DocumentUserDirectory {
        let directory = directory();
        for (i, name) in names.iter().enumerate() {
            directory
                .create_user(&uid(&format!("u{}", i)), name, &format!("u{}@example.com", i))
                .await
                .unwrap();
        }
        directory
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.username.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let directory = directory();
        directory
            .create_user(&uid("a1"), "ada", "ada@example.com")
            .await
            .unwrap();

        let user = directory.get_user(&uid("a1")).await.unwrap().unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.email, "ada@example.com");
        assert!(directory.get_user(&uid("nobody")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prefix_search_is_exact_and_case_sensitive() {
        let directory = seeded(&["ada", "adam", "Adele", "bob", "ad", "a"]).await;

        let found = directory.search_by_username_prefix("ad").await.unwrap();
        assert_eq!(names(&found), vec!["ad", "ada", "adam"]);

        let found = directory.search_by_username_prefix("Ad").await.unwrap();
        assert_eq!(names(&found), vec!["Adele"]);

        let found = directory.search_by_username_prefix("adamant").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_empty_prefix_yields_nothing() {
        let directory = seeded(&["ada", "bob"]).await;
        assert!(directory.search_by_username_prefix("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prefix_search_with_multibyte_and_sentinel() {
        let sentinel_name = format!("zo{}x", char::MAX);
        let directory = seeded(&["zoë", "zoe", sentinel_name.as_str(), "zp"]).await;

        let found = directory.search_by_username_prefix("zo").await.unwrap();
        assert_eq!(names(&found), vec!["zoe", "zoë", sentinel_name.as_str()]);

        let found = directory.search_by_username_prefix("zoë").await.unwrap();
        assert_eq!(names(&found), vec!["zoë"]);
    }

    #[tokio::test]
    async fn test_prefix_search_skips_malformed_records() {
        let store = Arc::new(InMemoryDocumentStore::new(StoreConfig::default()));
        let directory = DocumentUserDirectory::new(store.clone());
        directory
            .create_user(&uid("a1"), "ada", "ada@example.com")
            .await
            .unwrap();

        let fields = match serde_json::json!({ "username": "adam", "email": 42 }) {
            serde_json::Value::Object(fields) => fields,
            _ => unreachable!(),
        };
        store
            .set(USERS_COLLECTION, Document::new("a2", fields))
            .await
            .unwrap();

        let found = directory.search_by_username_prefix("ad").await.unwrap();
        assert_eq!(names(&found), vec!["ada"]);
    }

    #[tokio::test]
    async fn test_update_username() {
        let directory = seeded(&["ada"]).await;
        directory.update_username(&uid("u0"), "ada_l").await.unwrap();
        let user = directory.get_user(&uid("u0")).await.unwrap().unwrap();
        assert_eq!(user.username, "ada_l");
        assert_eq!(user.email, "u0@example.com");

        let err = directory.update_username(&uid("zz"), "x").await.unwrap_err();
        assert!(matches!(err, IdentityError::UserNotFound));

        let err = directory.update_username(&uid("u0"), " ").await.unwrap_err();
        assert!(matches!(err, IdentityError::MissingField("username")));

        let err = directory
            .update_username(&uid("u0"), &"a".repeat(65))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Username must be at most 64 characters"
        );
        let user = directory.get_user(&uid("u0")).await.unwrap().unwrap();
        assert_eq!(user.username, "ada_l");
    }
}
