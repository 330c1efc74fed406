//! Comments left on posts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PostId, User, UserId};

/// Comment text was empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("comment text must not be empty")]
pub struct EmptyCommentText;

/// Database identifier of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Comment body, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentText(String);

impl CommentText {
    /// Trim and validate comment text.
    pub fn new(value: impl AsRef<str>) -> Result<Self, EmptyCommentText> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmptyCommentText);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CommentText> for String {
    fn from(value: CommentText) -> Self {
        value.0
    }
}

impl TryFrom<String> for CommentText {
    type Error = EmptyCommentText;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// An immutable comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    post: PostId,
    author: User,
    text: CommentText,
    created: DateTime<Utc>,
}

impl Comment {
    /// Build a comment from stored parts.
    pub fn new(
        id: CommentId,
        post: PostId,
        author: User,
        text: CommentText,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post,
            author,
            text,
            created,
        }
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn post(&self) -> PostId {
        self.post
    }

    pub fn author(&self) -> &User {
        &self.author
    }

    pub fn text(&self) -> &CommentText {
        &self.text
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }
}

/// Data required to insert a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post: PostId,
    pub author: UserId,
    pub text: CommentText,
    pub created: DateTime<Utc>,
}
