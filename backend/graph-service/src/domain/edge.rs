use chrono::{DateTime, Utc};
use id_types::UserId;
use serde::{Deserialize, Serialize};

/// Sub-collection holding the users who follow `user_id`
pub fn followers_collection(user_id: &UserId) -> String {
    format!("users/{}/followers", user_id)
}

/// Sub-collection holding the users `user_id` follows
pub fn following_collection(user_id: &UserId) -> String {
    format!("users/{}/following", user_id)
}

/// Follow relation (directed edge follower -> followee)
///
/// Stored twice: under the followee's `followers` and under the follower's
/// `following`, each document keyed by the other user's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowEdge {
    pub follower_id: UserId,
    pub followee_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl FollowEdge {
    pub fn new(follower_id: UserId, followee_id: UserId) -> Self {
        Self {
            follower_id,
            followee_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_self_edge(&self) -> bool {
        self.follower_id == self.followee_id
    }

    pub fn record(&self) -> EdgeRecord {
        EdgeRecord {
            created_at: self.created_at,
        }
    }
}

/// Payload of each edge document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRecord {
    pub created_at: DateTime<Utc>,
}

/// Relation counts shown on a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub user_id: UserId,
    pub followers_count: usize,
    pub following_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(id: &str) -> UserId {
        UserId::parse(id, "user_id").unwrap()
    }

    #[test]
    fn test_collection_paths() {
        assert_eq!(followers_collection(&uid("b")), "users/b/followers");
        assert_eq!(following_collection(&uid("a")), "users/a/following");
    }

    #[test]
    fn test_create_follow_edge() {
        let edge = FollowEdge::new(uid("a"), uid("b"));
        assert_eq!(edge.follower_id, uid("a"));
        assert_eq!(edge.followee_id, uid("b"));
        assert!(!edge.is_self_edge());
        assert!(FollowEdge::new(uid("a"), uid("a")).is_self_edge());
    }

    #[test]
    fn test_edge_record_field_name() {
        let edge = FollowEdge::new(uid("a"), uid("b"));
        let value = serde_json::to_value(edge.record()).unwrap();
        assert!(value.get("createdAt").is_some());
    }
}
