use crate::store::CacheEntity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A discussion board.
///
/// Replaced wholesale on every refetch; never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forum {
    pub id: u64,
    pub title: String,
    pub description: String,
    /// User ids of the forum's members.
    #[serde(default)]
    pub members: BTreeSet<u64>,
}

impl Forum {
    pub fn new(id: u64, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            members: BTreeSet::new(),
        }
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = u64>) -> Self {
        self.members = members.into_iter().collect();
        self
    }

    pub fn is_member(&self, user_id: u64) -> bool {
        self.members.contains(&user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub forum_id: u64,
    pub title: String,
    pub content: String,
    pub author_id: u64,
    pub created_at: DateTime<Utc>,
}

/// A reply to a post. The owning post is implied by where it was fetched
/// from, so `post_id` may be absent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub content: String,
    pub author_id: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<u64>,
}

/// Payload for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub forum_id: u64,
}

/// Payload for creating a comment. `post_id` also selects the target path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub post_id: u64,
}

impl CacheEntity for Forum {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

impl CacheEntity for Post {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}

impl CacheEntity for Comment {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }
}
