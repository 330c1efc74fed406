//! Topic groups that posts may belong to.
//!
//! Groups are created out-of-band by administrators; this crate only reads
//! them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::slug::is_valid_slug;

/// Validation errors returned by [`GroupSlug::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupValidationError {
    /// Slug contains characters outside `[A-Za-z0-9_-]`, is blank or too long.
    #[error("group slug must be 1-50 letters, digits, hyphens or underscores")]
    InvalidSlug,
}

/// Database identifier of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(i64);

impl GroupId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL-safe unique group identifier.
///
/// # Examples
/// ```
/// use yatube::domain::GroupSlug;
///
/// assert!(GroupSlug::new("cats").is_ok());
/// assert!(GroupSlug::new("cats and dogs").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GroupSlug(String);

impl GroupSlug {
    /// Validate and construct a slug.
    pub fn new(value: impl Into<String>) -> Result<Self, GroupValidationError> {
        let value = value.into();
        if !is_valid_slug(&value) {
            return Err(GroupValidationError::InvalidSlug);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for GroupSlug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<GroupSlug> for String {
    fn from(value: GroupSlug) -> Self {
        value.0
    }
}

impl TryFrom<String> for GroupSlug {
    type Error = GroupValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A named topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: GroupId,
    title: String,
    slug: GroupSlug,
    description: String,
}

impl Group {
    /// Build a group from stored parts.
    pub fn new(
        id: GroupId,
        title: impl Into<String>,
        slug: GroupSlug,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            slug,
            description: description.into(),
        }
    }

    /// Database identifier.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Display title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Unique URL slug.
    pub fn slug(&self) -> &GroupSlug {
        &self.slug
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}
