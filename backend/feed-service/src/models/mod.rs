use content_service::Post;
use id_types::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Display name used when an author cannot be resolved
pub const UNKNOWN_USERNAME: &str = "Unknown User";

/// A post paired with its author's display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedPost {
    #[serde(flatten)]
    pub post: Post,
    pub username: String,
}

/// Everything the profile screen shows for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    pub user_id: UserId,
    pub username: String,
    /// Newest first
    pub posts: Vec<Post>,
    pub followers: BTreeSet<UserId>,
    pub following: BTreeSet<UserId>,
    /// Whether the viewer follows this user; always false on one's own profile
    pub is_following: bool,
    pub is_own_profile: bool,
}

impl ProfileView {
    pub fn followers_count(&self) -> usize {
        self.followers.len()
    }

    pub fn following_count(&self) -> usize {
        self.following.len()
    }
}
