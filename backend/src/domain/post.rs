//! Posts and their validated parts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Group, GroupId, User, UserId};

/// Number of characters shown when a post is displayed inline.
pub const POST_PREVIEW_CHARS: usize = 15;

/// Directory, relative to the media root, that holds post images.
pub const POST_IMAGE_DIR: &str = "posts";

/// Validation errors for post parts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// Text is empty once trimmed.
    #[error("post text must not be empty")]
    EmptyText,
    /// Image path escapes the post image directory.
    #[error("post image path must be a plain file name under {POST_IMAGE_DIR}/")]
    InvalidImagePath,
}

/// Database identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Post body, trimmed and non-empty.
///
/// # Examples
/// ```
/// use yatube::domain::PostText;
///
/// let text = PostText::new("  hello  ").expect("non-empty");
/// assert_eq!(text.as_ref(), "hello");
/// assert!(PostText::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostText(String);

impl PostText {
    /// Trim and validate post text.
    pub fn new(value: impl AsRef<str>) -> Result<Self, PostValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyText);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PostText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PostText> for String {
    fn from(value: PostText) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostText {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored image path relative to the media root, always under `posts/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostImage(String);

impl PostImage {
    /// Validate a stored image path such as `posts/cat.png`.
    pub fn new(path: impl Into<String>) -> Result<Self, PostValidationError> {
        let path = path.into();
        let file_name = path
            .strip_prefix(POST_IMAGE_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or(PostValidationError::InvalidImagePath)?;
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return Err(PostValidationError::InvalidImagePath);
        }
        Ok(Self(path))
    }

    /// Path relative to the media root.
    pub fn path(&self) -> &str {
        self.0.as_str()
    }

    /// File name without the directory prefix.
    pub fn file_name(&self) -> &str {
        self.0
            .rsplit_once('/')
            .map_or(self.0.as_str(), |(_, name)| name)
    }
}

impl From<PostImage> for String {
    fn from(value: PostImage) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostImage {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A published post with its author and group resolved.
///
/// ## Invariants
/// - `author` is fixed at creation; [`PostUpdate`] cannot change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    id: PostId,
    author: User,
    text: PostText,
    pub_date: DateTime<Utc>,
    group: Option<Group>,
    image: Option<PostImage>,
}

impl Post {
    /// Build a post from stored parts.
    pub fn new(
        id: PostId,
        author: User,
        text: PostText,
        pub_date: DateTime<Utc>,
        group: Option<Group>,
        image: Option<PostImage>,
    ) -> Self {
        Self {
            id,
            author,
            text,
            pub_date,
            group,
            image,
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn author(&self) -> &User {
        &self.author
    }

    pub fn text(&self) -> &PostText {
        &self.text
    }

    pub fn pub_date(&self) -> DateTime<Utc> {
        self.pub_date
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    pub fn image(&self) -> Option<&PostImage> {
        self.image.as_ref()
    }

    /// Whether `user` wrote this post.
    pub fn is_authored_by(&self, user: &User) -> bool {
        self.author.id() == user.id()
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.text.as_ref().chars().take(POST_PREVIEW_CHARS).collect();
        f.write_str(&preview)
    }
}

/// Data required to insert a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub author: UserId,
    pub text: PostText,
    pub pub_date: DateTime<Utc>,
    pub group: Option<GroupId>,
    pub image: Option<PostImage>,
}

/// Replacement values for an existing post.
///
/// `image: None` keeps the stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub text: PostText,
    pub group: Option<GroupId>,
    pub image: Option<PostImage>,
}

/// Which posts a listing selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post.
    All,
    /// Posts in one group.
    Group(GroupId),
    /// Posts written by one author.
    Author(UserId),
    /// Posts written by anyone the given user follows.
    FollowedBy(UserId),
}
