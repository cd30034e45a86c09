//! The client object the screens talk to
//!
//! Constructed once with an injected document store; owns every service and
//! the session. Operations that act on behalf of the viewer read it from the
//! current session.

use crate::config::Config;
use crate::error::{IntoUserFacing, UserFacingError};
use content_service::{DocumentPostStore, Post, PostStore};
use doc_store::{DocumentStore, InMemoryDocumentStore};
use feed_service::{EnrichedPost, FeedComposer, ProfileView};
use graph_service::{DocumentGraphRepository, GraphRepositoryTrait};
use id_types::{PostId, UserId};
use identity_service::{
    AuthState, AuthStateChanges, AuthSubscription, DocumentUserDirectory, IdentityGateway,
    Session, StoreAuthProvider, User, UserDirectory,
};
use std::sync::Arc;
use tracing::{debug, info};

pub type ClientResult<T> = std::result::Result<T, UserFacingError>;

pub struct SocialClient {
    store: Arc<dyn DocumentStore>,
    identity: IdentityGateway,
    users: Arc<dyn UserDirectory>,
    graph: Arc<dyn GraphRepositoryTrait>,
    posts: Arc<dyn PostStore>,
    feed: FeedComposer,
}

impl SocialClient {
    pub fn new(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        let users: Arc<dyn UserDirectory> = Arc::new(DocumentUserDirectory::new(store.clone()));
        let graph: Arc<dyn GraphRepositoryTrait> =
            Arc::new(DocumentGraphRepository::new(store.clone()));
        let posts: Arc<dyn PostStore> = Arc::new(DocumentPostStore::new(store.clone()));

        let provider = Arc::new(StoreAuthProvider::new(store.clone(), config.identity.clone()));
        let identity = IdentityGateway::new(provider, users.clone(), config.identity.clone());
        let feed = FeedComposer::new(
            graph.clone(),
            posts.clone(),
            users.clone(),
            config.feed.clone(),
        );

        info!(env = %config.app.env, "Social client ready");
        Self {
            store,
            identity,
            users,
            graph,
            posts,
            feed,
        }
    }

    /// Client backed by a fresh in-process store
    pub fn in_memory(config: &Config) -> Self {
        let store = Arc::new(InMemoryDocumentStore::new(config.store.clone()));
        Self::new(store, config)
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    async fn viewer(&self) -> ClientResult<UserId> {
        self.identity
            .current_user()
            .await
            .ok_or_else(UserFacingError::signed_out)
    }

    // ---- identity ----

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> ClientResult<UserId> {
        self.identity
            .sign_up(email, password, username)
            .await
            .map_err(|e| e.user_facing("sign_up"))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> ClientResult<Session> {
        self.identity
            .sign_in(email, password)
            .await
            .map_err(|e| e.user_facing("sign_in"))
    }

    pub async fn sign_out(&self) {
        self.identity.sign_out().await;
    }

    pub async fn current_user(&self) -> Option<UserId> {
        self.identity.current_user().await
    }

    pub async fn auth_state(&self) -> AuthState {
        self.identity.auth_state().await
    }

    pub async fn watch_auth(&self) -> AuthStateChanges {
        self.identity.subscribe().await
    }

    pub async fn on_auth_state_change<F>(&self, callback: F) -> AuthSubscription
    where
        F: Fn(AuthState) + Send + 'static,
    {
        self.identity.on_auth_state_change(callback).await
    }

    // ---- directory ----

    /// Users whose username starts with the (trimmed) search text
    pub async fn search_users(&self, text: &str) -> ClientResult<Vec<User>> {
        self.users
            .search_by_username_prefix(text.trim())
            .await
            .map_err(|e| e.user_facing("search_users"))
    }

    pub async fn update_username(&self, username: &str) -> ClientResult<()> {
        let viewer = self.viewer().await?;
        self.users
            .update_username(&viewer, username)
            .await
            .map_err(|e| e.user_facing("update_username"))
    }

    // ---- graph ----

    pub async fn follow(&self, target: &UserId) -> ClientResult<()> {
        let viewer = self.viewer().await?;
        self.graph
            .follow(&viewer, target)
            .await
            .map_err(|e| e.user_facing("follow"))
    }

    pub async fn unfollow(&self, target: &UserId) -> ClientResult<()> {
        let viewer = self.viewer().await?;
        self.graph
            .unfollow(&viewer, target)
            .await
            .map_err(|e| e.user_facing("unfollow"))
    }

    /// Follow or unfollow depending on the current relation; returns the new state
    pub async fn toggle_follow(&self, target: &UserId) -> ClientResult<bool> {
        let viewer = self.viewer().await?;
        let following = self
            .graph
            .is_following(&viewer, target)
            .await
            .map_err(|e| e.user_facing("toggle_follow"))?;

        let result = if following {
            self.graph.unfollow(&viewer, target).await
        } else {
            self.graph.follow(&viewer, target).await
        };
        result.map_err(|e| e.user_facing("toggle_follow"))?;

        debug!(viewer = %viewer, target = %target, following = !following, "Toggled follow");
        Ok(!following)
    }

    // ---- posts and feeds ----

    pub async fn create_post(&self, caption: &str, photo_url: &str) -> ClientResult<PostId> {
        let viewer = self.viewer().await?;
        self.posts
            .create_post(&viewer, caption, photo_url)
            .await
            .map_err(|e| e.user_facing("create_post"))
    }

    pub async fn home_feed(&self) -> ClientResult<Vec<EnrichedPost>> {
        let viewer = self.viewer().await?;
        self.feed
            .build_home_feed(&viewer)
            .await
            .map_err(|e| e.user_facing("home_feed"))
    }

    pub async fn discover_feed(&self) -> ClientResult<Vec<Post>> {
        let viewer = self.viewer().await?;
        self.feed
            .build_discover_feed(&viewer)
            .await
            .map_err(|e| e.user_facing("discover_feed"))
    }

    /// Profile of `user`, or of the viewer when `None`
    pub async fn profile(&self, user: Option<&UserId>) -> ClientResult<ProfileView> {
        let viewer = self.viewer().await?;
        let user = user.unwrap_or(&viewer);
        self.feed
            .build_profile(&viewer, user)
            .await
            .map_err(|e| e.user_facing("profile"))
    }

    /// End the session; observers receive a final signed-out state
    pub async fn shutdown(&self) {
        self.identity.sign_out().await;
        info!("Social client shut down");
    }
}
