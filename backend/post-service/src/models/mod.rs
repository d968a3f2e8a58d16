/// Data models for post-service
///
/// - `Post`: an emoji-only entry, immutable once stored
/// - `AuthorSummary`: the identity provider's view of a user
/// - `FeedEntry`: a post joined with its author, built per feed request
/// - `NewPost`: validated creation input
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Longest post, in Unicode code points.
pub const MAX_POST_LENGTH: u64 = 280;

/// Opaque user reference in the identity provider's namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(String);

impl AuthorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AuthorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AuthorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author_id: AuthorId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Projection of an identity-provider user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorSummary {
    pub id: AuthorId,
    /// Absent when the user never picked one
    pub username: Option<String>,
    pub profile_image_url: String,
}

impl AuthorSummary {
    /// Username, if present and non-empty.
    pub fn resolved_username(&self) -> Option<&str> {
        self.username.as_deref().filter(|name| !name.is_empty())
    }
}

/// Post joined with its author for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub post: Post,
    pub author: AuthorSummary,
}

/// Create post request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPost {
    #[validate(
        length(min = 1, max = 280, message = "Post must be between 1 and 280 characters"),
        custom(function = "crate::validators::validate_emoji_only")
    )]
    pub content: String,
}

impl NewPost {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
