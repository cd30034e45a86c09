//! Identity gateway: sign-up, sign-in, sign-out and the current session

use crate::config::IdentityConfig;
use crate::db::UserDirectory;
use crate::error::{IdentityError, Result};
use crate::models::{AuthState, Session};
use crate::services::auth_provider::AuthProvider;
use crate::services::auth_state::{AuthStateChanges, AuthSubscription};
use crate::validators::{require, SignUpRequest};
use id_types::UserId;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info};

pub struct IdentityGateway {
    provider: Arc<dyn AuthProvider>,
    directory: Arc<dyn UserDirectory>,
    config: IdentityConfig,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthState>,
}

impl IdentityGateway {
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        directory: Arc<dyn UserDirectory>,
        config: IdentityConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.auth_event_capacity.max(1));
        Self {
            provider,
            directory,
            config,
            session: RwLock::new(None),
            events,
        }
    }

    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }

    /// Register an account and its directory record.
    ///
    /// The new user is not signed in. When the directory write fails the
    /// account is removed again, so a retry starts from a clean slate.
    pub async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<UserId> {
        let request = SignUpRequest::new(email, password, username);
        request.check(self.config.min_password_length)?;

        let user_id = self
            .provider
            .create_account(&request.email, &request.password)
            .await?;

        if let Err(e) = self
            .directory
            .create_user(&user_id, &request.username, &request.email)
            .await
        {
            error!(
                user_id = %user_id,
                error = %e,
                "User record could not be saved; removing the new account"
            );
            // Leaves the email free so the sign-up can be retried
            let rollback = self.provider.delete_account(&user_id, &request.email).await;
            if let Err(rollback) = rollback {
                error!(
                    user_id = %user_id,
                    error = %rollback,
                    "Failed to remove account without a user record"
                );
            }
            return Err(e);
        }

        info!(user_id = %user_id, username = %request.username, "User signed up");
        Ok(user_id)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        require("email", email)?;
        require("password", password)?;

        let user_id = self.provider.authenticate(email.trim(), password).await?;
        let session = Session::new(user_id, email.trim());

        let mut current = self.session.write().await;
        *current = Some(session.clone());
        // Published under the write guard so observers see changes in order
        let _ = self.events.send(AuthState::SignedIn(session.clone()));
        drop(current);

        info!(user_id = %session.user_id, "User signed in");
        Ok(session)
    }

    /// End the current session; a no-op when nobody is signed in
    pub async fn sign_out(&self) {
        let mut current = self.session.write().await;
        if let Some(session) = current.take() {
            let _ = self.events.send(AuthState::SignedOut);
            info!(user_id = %session.user_id, "User signed out");
        }
    }

    pub async fn current_user(&self) -> Option<UserId> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|s| s.user_id.clone())
    }

    pub async fn current_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn auth_state(&self) -> AuthState {
        AuthState::from_session(self.current_session().await)
    }

    /// Pull-based observation, yielding the current state first
    pub async fn subscribe(&self) -> AuthStateChanges {
        let current = self.session.read().await;
        // Subscribing while holding the guard: no change can slip in between
        let rx = self.events.subscribe();
        AuthStateChanges::new(AuthState::from_session(current.clone()), rx)
    }

    /// Invoke `callback` with the current state now and on every later change
    pub async fn on_auth_state_change<F>(&self, callback: F) -> AuthSubscription
    where
        F: Fn(AuthState) + Send + 'static,
    {
        let changes = self.subscribe().await;
        AuthSubscription::spawn(changes, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DocumentUserDirectory;
    use crate::services::auth_provider::StoreAuthProvider;
    use doc_store::{DocumentStore, InMemoryDocumentStore, StoreConfig};
    use mockall::mock;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn gateway() -> IdentityGateway {
        let store: Arc<dyn DocumentStore> =
            Arc::new(InMemoryDocumentStore::new(StoreConfig::default()));
        let config = IdentityConfig::low_cost();
        IdentityGateway::new(
            Arc::new(StoreAuthProvider::new(store.clone(), config.clone())),
            Arc::new(DocumentUserDirectory::new(store)),
            config,
        )
    }

    #[tokio::test]
    async fn test_sign_up_creates_directory_record() {
        let gateway = gateway();
        let id = gateway
            .sign_up("ada@example.com", "secret1", "ada")
            .await
            .unwrap();

        let user = gateway.directory().get_user(&id).await.unwrap().unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(gateway.current_user().await, None);
    }

    #[tokio::test]
    async fn test_sign_up_twice_fails() {
        let gateway = gateway();
        gateway
            .sign_up("ada@example.com", "secret1", "ada")
            .await
            .unwrap();
        let err = gateway
            .sign_up("ada@example.com", "secret2", "ada2")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_sign_up_validates_before_remote_call() {
        let gateway = gateway();
        let err = gateway.sign_up("", "secret1", "ada").await.unwrap_err();
        assert!(matches!(err, IdentityError::MissingField("email")));
        let err = gateway.sign_in("ada@example.com", "").await.unwrap_err();
        assert!(matches!(err, IdentityError::MissingField("password")));
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let gateway = gateway();
        let id = gateway
            .sign_up("ada@example.com", "secret1", "ada")
            .await
            .unwrap();

        let err = gateway
            .sign_in("ada@example.com", "wrong-one")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));
        assert_eq!(gateway.current_user().await, None);

        let session = gateway.sign_in("ada@example.com", "secret1").await.unwrap();
        assert_eq!(session.user_id, id);
        assert_eq!(gateway.current_user().await, Some(id));

        gateway.sign_out().await;
        assert_eq!(gateway.current_user().await, None);
        // Second sign-out is harmless
        gateway.sign_out().await;
    }

    #[tokio::test]
    async fn test_subscribe_yields_current_then_changes() {
        let gateway = gateway();
        let id = gateway
            .sign_up("ada@example.com", "secret1", "ada")
            .await
            .unwrap();

        let mut changes = gateway.subscribe().await;
        assert_eq!(changes.next().await, Some(AuthState::SignedOut));

        gateway.sign_in("ada@example.com", "secret1").await.unwrap();
        gateway.sign_out().await;

        let signed_in = changes.next().await.unwrap();
        assert_eq!(signed_in.user_id(), Some(&id));
        assert_eq!(changes.next().await, Some(AuthState::SignedOut));
    }

    #[tokio::test]
    async fn test_callback_subscription_and_unsubscribe() {
        let gateway = gateway();
        gateway
            .sign_up("ada@example.com", "secret1", "ada")
            .await
            .unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscription = gateway
            .on_auth_state_change(move |state| {
                let _ = tx.send(state.is_signed_in());
            })
            .await;

        // Delivered immediately with the current state
        assert_eq!(rx.try_recv().ok(), Some(false));
        assert!(subscription.is_active());

        gateway.sign_in("ada@example.com", "secret1").await.unwrap();
        let delivered = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(delivered, Some(true));

        subscription.unsubscribe();
        gateway.sign_out().await;

        // The callback (and its sender) is gone once the task is cancelled
        let after = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(after, None);
    }

    mock! {
        pub Provider {}

        #[async_trait::async_trait]
        impl AuthProvider for Provider {
            async fn create_account(&self, email: &str, password: &str) -> Result<UserId>;
            async fn authenticate(&self, email: &str, password: &str) -> Result<UserId>;
            async fn delete_account(&self, user_id: &UserId, email: &str) -> Result<()>;
        }
    }

    mock! {
        pub Directory {}

        #[async_trait::async_trait]
        impl UserDirectory for Directory {
            async fn create_user(&self, id: &UserId, username: &str, email: &str) -> Result<()>;
            async fn get_user(&self, id: &UserId) -> Result<Option<crate::models::User>>;
            async fn search_by_username_prefix(&self, prefix: &str) -> Result<Vec<crate::models::User>>;
            async fn update_username(&self, id: &UserId, username: &str) -> Result<()>;
        }
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_provider() {
        let mut provider = MockProvider::new();
        provider.expect_create_account().never();
        let gateway = IdentityGateway::new(
            Arc::new(provider),
            Arc::new(MockDirectory::new()),
            IdentityConfig::low_cost(),
        );

        let err = gateway
            .sign_up("not-an-email", "secret1", "ada")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidEmail(_)));

        let err = gateway
            .sign_up("ada@example.com", "abc", "ada")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::WeakPassword(_)));
    }

    #[tokio::test]
    async fn test_directory_failure_is_reported() {
        let mut provider = MockProvider::new();
        provider
            .expect_create_account()
            .times(1)
            .returning(|_, _| Ok(UserId::parse("u1", "user_id").unwrap()));
        provider
            .expect_delete_account()
            .withf(|id, email| id.as_str() == "u1" && email == "ada@example.com")
            .times(1)
            .returning(|_, _| Ok(()));
        let mut directory = MockDirectory::new();
        directory
            .expect_create_user()
            .times(1)
            .returning(|_, _, _| Err(IdentityError::Network("offline".into())));

        let gateway = IdentityGateway::new(
            Arc::new(provider),
            Arc::new(directory),
            IdentityConfig::low_cost(),
        );
        let err = gateway
            .sign_up("ada@example.com", "secret1", "ada")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Network(_)));
    }

    /// Directory whose next `create_user` fails, then behaves normally
    struct FlakyDirectory {
        inner: DocumentUserDirectory,
        fail_next: AtomicBool,
    }

    #[async_trait::async_trait]
    impl UserDirectory for FlakyDirectory {
        async fn create_user(&self, id: &UserId, username: &str, email: &str) -> Result<()> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(IdentityError::Network("offline".into()));
            }
            self.inner.create_user(id, username, email).await
        }

        async fn get_user(&self, id: &UserId) -> Result<Option<crate::models::User>> {
            self.inner.get_user(id).await
        }

        async fn search_by_username_prefix(
            &self,
            prefix: &str,
        ) -> Result<Vec<crate::models::User>> {
            self.inner.search_by_username_prefix(prefix).await
        }

        async fn update_username(&self, id: &UserId, username: &str) -> Result<()> {
            self.inner.update_username(id, username).await
        }
    }

    #[tokio::test]
    async fn test_sign_up_can_be_retried_after_directory_failure() {
        let store: Arc<dyn DocumentStore> =
            Arc::new(InMemoryDocumentStore::new(StoreConfig::default()));
        let config = IdentityConfig::low_cost();
        let gateway = IdentityGateway::new(
            Arc::new(StoreAuthProvider::new(store.clone(), config.clone())),
            Arc::new(FlakyDirectory {
                inner: DocumentUserDirectory::new(store),
                fail_next: AtomicBool::new(true),
            }),
            config,
        );

        let err = gateway
            .sign_up("ada@example.com", "secret1", "ada")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Network(_)));

        // No half-registered account is left behind
        let err = gateway
            .sign_in("ada@example.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredentials));

        let id = gateway
            .sign_up("ada@example.com", "secret1", "ada")
            .await
            .unwrap();
        let session = gateway.sign_in("ada@example.com", "secret1").await.unwrap();
        assert_eq!(session.user_id, id);

        let user = gateway.directory().get_user(&id).await.unwrap().unwrap();
        assert_eq!(user.username, "ada");
    }
}
