//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::{
    Comment, CommentId, CommentText, Group, GroupId, GroupSlug, Post, PostId, PostImage,
    PostText, User, UserId, Username,
};

use super::schema::{comments, follows, groups, posts, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
}

impl UserRow {
    pub fn into_domain(self) -> Result<User, String> {
        let username = Username::new(self.username)
            .map_err(|err| format!("invalid stored username for user {}: {err}", self.id))?;
        Ok(User::new(UserId::new(self.id), username))
    }
}

/// Row struct for reading from the groups table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupRow {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

impl GroupRow {
    pub fn into_domain(self) -> Result<Group, String> {
        let slug = GroupSlug::new(self.slug)
            .map_err(|err| format!("invalid stored slug for group {}: {err}", self.id))?;
        Ok(Group::new(
            GroupId::new(self.id),
            self.title,
            slug,
            self.description,
        ))
    }
}

/// Row struct for reading from the posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<String>,
}

impl PostRow {
    /// Combine the row with its already loaded author and group.
    pub fn into_domain(self, author: User, group: Option<Group>) -> Result<Post, String> {
        let text = PostText::new(&self.text)
            .map_err(|err| format!("invalid stored text for post {}: {err}", self.id))?;
        let image = self
            .image
            .map(PostImage::new)
            .transpose()
            .map_err(|err| format!("invalid stored image for post {}: {err}", self.id))?;
        Ok(Post::new(
            PostId::new(self.id),
            author,
            text,
            self.pub_date,
            group,
            image,
        ))
    }
}

/// Insertable struct for creating posts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub text: &'a str,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<&'a str>,
}

/// Changeset for editing a post.
///
/// `group_id: Some(None)` clears the group; `image: None` leaves the stored
/// image untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = posts)]
pub(crate) struct PostChangeset<'a> {
    pub text: &'a str,
    pub group_id: Option<Option<i64>>,
    pub image: Option<&'a str>,
}

/// Row struct for reading from the comments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub post_id: i64,
    pub author_id: i64,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl CommentRow {
    pub fn into_domain(self, author: User) -> Result<Comment, String> {
        let text = CommentText::new(&self.text)
            .map_err(|err| format!("invalid stored text for comment {}: {err}", self.id))?;
        Ok(Comment::new(
            CommentId::new(self.id),
            PostId::new(self.post_id),
            author,
            text,
            self.created,
        ))
    }
}

/// Insertable struct for creating comments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub post_id: i64,
    pub author_id: i64,
    pub text: &'a str,
    pub created: DateTime<Utc>,
}

/// Insertable struct for creating follows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = follows)]
pub(crate) struct NewFollowRow {
    pub user_id: i64,
    pub author_id: i64,
}
