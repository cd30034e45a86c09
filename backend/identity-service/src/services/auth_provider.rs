//! Authentication backend
//!
//! The gateway needs a few primitives from the backend: create an account
//! for an email/password pair and resolve a pair back to its user id, plus a
//! delete used to undo a sign-up whose directory record failed. The
//! document-store provider keeps Argon2id hashes in the `credentials`
//! collection; hashing runs on the blocking pool.

use crate::config::IdentityConfig;
use crate::db::{CredentialRecord, CREDENTIALS_COLLECTION};
use crate::error::{IdentityError, Result};
use crate::security::{hash_password, verify_password};
use crate::validators::normalize_email;
use doc_store::{Document, DocumentStore};
use id_types::UserId;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// Register a new account; fails with `AlreadyExists` for a taken email
    async fn create_account(&self, email: &str, password: &str) -> Result<UserId>;

    /// Resolve credentials to a user id; fails with `InvalidCredentials`
    async fn authenticate(&self, email: &str, password: &str) -> Result<UserId>;

    /// Remove the account registered for `email` if it belongs to `user_id`.
    /// Removing an account that does not exist is a no-op.
    async fn delete_account(&self, user_id: &UserId, email: &str) -> Result<()>;
}

pub struct StoreAuthProvider {
    store: Arc<dyn DocumentStore>,
    config: IdentityConfig,
}

impl StoreAuthProvider {
    pub fn new(store: Arc<dyn DocumentStore>, config: IdentityConfig) -> Self {
        Self { store, config }
    }
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| IdentityError::Internal(format!("Password task failed: {}", e)))?
}

#[async_trait::async_trait]
impl AuthProvider for StoreAuthProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<UserId> {
        let key = normalize_email(email);
        let password = password.to_string();
        let config = self.config.clone();
        let password_hash = run_blocking(move || hash_password(&password, &config)).await?;

        let user_id = UserId::generate();
        let record = CredentialRecord {
            user_id: user_id.clone(),
            email: key.clone(),
            password_hash,
        };
        let doc = Document::from_record(key.as_str(), &record).map_err(IdentityError::from_write)?;

        self.store
            .create(CREDENTIALS_COLLECTION, doc)
            .await
            .map_err(|e| {
                warn!(error = %e, "Account creation rejected");
                IdentityError::from_write(e)
            })?;

        info!(user_id = %user_id, "Account created");
        Ok(user_id)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<UserId> {
        let key = normalize_email(email);
        let doc = self
            .store
            .get(CREDENTIALS_COLLECTION, &key)
            .await
            .map_err(IdentityError::from_read)?;

        let Some(doc) = doc else {
            debug!("Sign-in for unknown email");
            return Err(IdentityError::InvalidCredentials);
        };
        let record: CredentialRecord = doc.to_record().map_err(IdentityError::from_read)?;

        let password = password.to_string();
        let hash = record.password_hash.clone();
        let valid = run_blocking(move || verify_password(&password, &hash)).await?;
        if !valid {
            debug!(user_id = %record.user_id, "Sign-in with wrong password");
            return Err(IdentityError::InvalidCredentials);
        }

        Ok(record.user_id)
    }

    async fn delete_account(&self, user_id: &UserId, email: &str) -> Result<()> {
        let key = normalize_email(email);
        let doc = self
            .store
            .get(CREDENTIALS_COLLECTION, &key)
            .await
            .map_err(IdentityError::from_read)?;

        let Some(doc) = doc else {
            return Ok(());
        };
        let record: CredentialRecord = doc.to_record().map_err(IdentityError::from_read)?;
        if &record.user_id != user_id {
            warn!(
                user_id = %user_id,
                owner = %record.user_id,
                "Account belongs to another user; not deleting"
            );
            return Ok(());
        }

        self.store
            .delete(CREDENTIALS_COLLECTION, &key)
            .await
            .map_err(IdentityError::from_write)?;

        info!(user_id = %user_id, "Account deleted");
        Ok(())
    }
}
