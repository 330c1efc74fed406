//! Row storage behind [`super::InMemoryStore`].

use std::cmp::Reverse;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::domain::{
    Comment, CommentId, CommentText, Group, GroupId, Post, PostFilter, PostId, PostImage,
    PostText, User, UserId,
};

#[derive(Debug, Clone)]
pub(super) struct PostRow {
    pub id: PostId,
    pub author: UserId,
    pub text: PostText,
    pub pub_date: DateTime<Utc>,
    pub group: Option<GroupId>,
    pub image: Option<PostImage>,
}

#[derive(Debug, Clone)]
pub(super) struct CommentRow {
    pub id: CommentId,
    pub post: PostId,
    pub author: UserId,
    pub text: CommentText,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub(super) struct State {
    last_id: i64,
    pub users: Vec<User>,
    pub groups: Vec<Group>,
    pub posts: Vec<PostRow>,
    pub comments: Vec<CommentRow>,
    pub follows: BTreeSet<(UserId, UserId)>,
}

impl State {
    /// Allocate an identifier; ids are unique across every table.
    pub fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id() == id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.id() == id)
    }

    fn matches(&self, row: &PostRow, filter: PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(group) => row.group == Some(group),
            PostFilter::Author(author) => row.author == author,
            PostFilter::FollowedBy(follower) => self.follows.contains(&(follower, row.author)),
        }
    }

    /// Rows selected by `filter`, newest first with ties broken by id.
    pub fn select(&self, filter: PostFilter) -> Vec<&PostRow> {
        let mut rows: Vec<&PostRow> = self
            .posts
            .iter()
            .filter(|row| self.matches(row, filter))
            .collect();
        rows.sort_by_key(|row| Reverse((row.pub_date, row.id)));
        rows
    }

    /// Resolve a row's author and group. Rows whose author vanished are
    /// skipped.
    pub fn assemble_post(&self, row: &PostRow) -> Option<Post> {
        let author = self.user(row.author)?.clone();
        let group = row.group.and_then(|id| self.group(id)).cloned();
        Some(Post::new(
            row.id,
            author,
            row.text.clone(),
            row.pub_date,
            group,
            row.image.clone(),
        ))
    }

    pub fn assemble_comment(&self, row: &CommentRow) -> Option<Comment> {
        let author = self.user(row.author)?.clone();
        Some(Comment::new(
            row.id,
            row.post,
            author,
            row.text.clone(),
            row.created,
        ))
    }
}
