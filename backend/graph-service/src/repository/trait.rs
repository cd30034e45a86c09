use crate::domain::edge::GraphStats;
use crate::error::Result;
use id_types::UserId;
use std::collections::BTreeSet;

/// Trait defining the interface for social graph operations.
/// Callers depend on this seam; `DocumentGraphRepository` is the store-backed implementation.
#[async_trait::async_trait]
pub trait GraphRepositoryTrait: Send + Sync {
    /// Create a follow relationship (both edge documents, atomically)
    async fn follow(&self, follower_id: &UserId, followee_id: &UserId) -> Result<()>;

    /// Delete a follow relationship; a missing relationship is a no-op
    async fn unfollow(&self, follower_id: &UserId, followee_id: &UserId) -> Result<()>;

    /// Check if follower is following followee
    async fn is_following(&self, follower_id: &UserId, followee_id: &UserId) -> Result<bool>;

    /// Users following `user_id`
    async fn list_followers(&self, user_id: &UserId) -> Result<BTreeSet<UserId>>;

    /// Users that `user_id` follows
    async fn list_following(&self, user_id: &UserId) -> Result<BTreeSet<UserId>>;

    /// Follower and following counts
    async fn stats(&self, user_id: &UserId) -> Result<GraphStats> {
        let followers = self.list_followers(user_id).await?;
        let following = self.list_following(user_id).await?;
        Ok(GraphStats {
            user_id: user_id.clone(),
            followers_count: followers.len(),
            following_count: following.len(),
        })
    }

    /// Check if two users are mutual followers
    /// Returns: (are_mutuals, a_follows_b, b_follows_a)
    async fn are_mutual_followers(
        &self,
        user_a: &UserId,
        user_b: &UserId,
    ) -> Result<(bool, bool, bool)> {
        let a_follows_b = self.is_following(user_a, user_b).await?;
        let b_follows_a = self.is_following(user_b, user_a).await?;
        Ok((a_follows_b && b_follows_a, a_follows_b, b_follows_a))
    }

    /// Health check (optional)
    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
