/// Data models for content-service
///
/// - `PostRecord`: the stored document (`authorId`, `caption`, `photoUrl`, `timestamp`)
/// - `Post`: a record joined with its id
/// - `NewPost`: the post-creation form, checked before any write
use crate::error::{ContentError, Result};
use chrono::{DateTime, Utc};
use id_types::{PostId, UserId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub author_id: UserId,
    pub caption: String,
    pub photo_url: String,
    /// Milliseconds since the epoch, so that stored values order numerically
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub caption: String,
    pub photo_url: String,
    pub timestamp: DateTime<Utc>,
}

impl Post {
    pub fn from_record(id: PostId, record: PostRecord) -> Self {
        Self {
            id,
            author_id: record.author_id,
            caption: record.caption,
            photo_url: record.photo_url,
            timestamp: record.timestamp,
        }
    }

    /// Feed order: newest first, ties broken by ascending post id
    pub fn newest_first(a: &Post, b: &Post) -> Ordering {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// Post-creation form
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: UserId,
    pub caption: String,
    pub photo_url: String,
}

impl NewPost {
    pub fn new(author_id: UserId, caption: &str, photo_url: &str) -> Self {
        Self {
            author_id,
            caption: caption.to_string(),
            photo_url: photo_url.to_string(),
        }
    }

    /// Both a caption and an image are required; whitespace alone counts as missing
    pub fn check(&self) -> Result<()> {
        if self.photo_url.trim().is_empty() {
            return Err(ContentError::MissingField("photoUrl"));
        }
        if self.caption.trim().is_empty() {
            return Err(ContentError::MissingField("caption"));
        }
        Ok(())
    }

    pub fn into_record(self, timestamp: DateTime<Utc>) -> PostRecord {
        PostRecord {
            author_id: self.author_id,
            caption: self.caption,
            photo_url: self.photo_url,
            timestamp,
        }
    }
}
