//! Home feed, discover feed and profile composition
//!
//! Fetches run in order (follow graph, then posts). Author names are then
//! resolved once per distinct author with bounded concurrency; a failed or
//! empty lookup falls back to [`UNKNOWN_USERNAME`] instead of failing the
//! build.

use crate::config::FeedConfig;
use crate::error::{FeedStage, Result, StageExt};
use crate::models::{EnrichedPost, ProfileView, UNKNOWN_USERNAME};
use content_service::{Post, PostStore};
use futures::stream::{self, StreamExt};
use graph_service::GraphRepositoryTrait;
use id_types::UserId;
use identity_service::UserDirectory;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct FeedComposer {
    graph: Arc<dyn GraphRepositoryTrait>,
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserDirectory>,
    config: FeedConfig,
}

impl FeedComposer {
    pub fn new(
        graph: Arc<dyn GraphRepositoryTrait>,
        posts: Arc<dyn PostStore>,
        users: Arc<dyn UserDirectory>,
        config: FeedConfig,
    ) -> Self {
        Self {
            graph,
            posts,
            users,
            config,
        }
    }

    /// Posts by the viewer and everyone they follow, with author names
    pub async fn build_home_feed(&self, viewer: &UserId) -> Result<Vec<EnrichedPost>> {
        let mut authors = self
            .graph
            .list_following(viewer)
            .await
            .or_unavailable(FeedStage::Following)?;
        authors.insert(viewer.clone());

        let posts = self
            .posts
            .list_by_authors(&authors)
            .await
            .or_unavailable(FeedStage::Posts)?;

        let distinct: BTreeSet<UserId> = posts.iter().map(|p| p.author_id.clone()).collect();
        let names = self.resolve_usernames(distinct).await;

        let mut feed: Vec<EnrichedPost> = posts
            .into_iter()
            .map(|post| {
                let username = names
                    .get(&post.author_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_USERNAME.to_string());
                EnrichedPost { post, username }
            })
            .collect();
        feed.sort_by(|a, b| Post::newest_first(&a.post, &b.post));

        info!(
            viewer = %viewer,
            authors = authors.len(),
            posts = feed.len(),
            "Built home feed"
        );
        Ok(feed)
    }

    /// Posts by everyone the viewer does not follow, excluding the viewer
    pub async fn build_discover_feed(&self, viewer: &UserId) -> Result<Vec<Post>> {
        let mut excluded = self
            .graph
            .list_following(viewer)
            .await
            .or_unavailable(FeedStage::Following)?;
        excluded.insert(viewer.clone());

        // Filtered here rather than with a `not-in` query, which the store caps
        let mut posts: Vec<Post> = self
            .posts
            .list_all()
            .await
            .or_unavailable(FeedStage::Posts)?
            .into_iter()
            .filter(|p| !excluded.contains(&p.author_id))
            .collect();
        posts.sort_by(Post::newest_first);

        info!(viewer = %viewer, posts = posts.len(), "Built discover feed");
        Ok(posts)
    }

    pub async fn build_profile(&self, viewer: &UserId, user: &UserId) -> Result<ProfileView> {
        let (posts, followers, following) = tokio::try_join!(
            async {
                self.posts
                    .list_by_author(user)
                    .await
                    .or_unavailable(FeedStage::Posts)
            },
            async {
                self.graph
                    .list_followers(user)
                    .await
                    .or_unavailable(FeedStage::Followers)
            },
            async {
                self.graph
                    .list_following(user)
                    .await
                    .or_unavailable(FeedStage::Following)
            },
        )?;
        let username = self.lookup_username(user).await;

        let is_own_profile = viewer == user;
        let is_following = !is_own_profile && followers.contains(viewer);

        debug!(viewer = %viewer, user = %user, posts = posts.len(), "Built profile");
        Ok(ProfileView {
            user_id: user.clone(),
            username,
            posts,
            followers,
            following,
            is_following,
            is_own_profile,
        })
    }

    async fn resolve_usernames(&self, authors: BTreeSet<UserId>) -> HashMap<UserId, String> {
        let concurrency = self.config.author_lookup_concurrency.max(1);
        stream::iter(authors)
            .map(|author| async move {
                let username = self.lookup_username(&author).await;
                (author, username)
            })
            .buffer_unordered(concurrency)
            .collect()
            .await
    }

    async fn lookup_username(&self, user: &UserId) -> String {
        match self.users.get_user(user).await {
            Ok(Some(record)) if !record.username.trim().is_empty() => record.username,
            Ok(_) => {
                debug!(user_id = %user, "Author has no username");
                UNKNOWN_USERNAME.to_string()
            }
            Err(e) => {
                warn!(user_id = %user, error = %e, "Author lookup failed");
                UNKNOWN_USERNAME.to_string()
            }
        }
    }
}
