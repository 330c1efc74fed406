//! Port implementations for [`InMemoryStore`].

use async_trait::async_trait;

use crate::domain::ports::{
    CommentPersistenceError, CommentRepository, FollowPersistenceError, FollowRepository,
    GroupPersistenceError, GroupRepository, PostPersistenceError, PostRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Comment, CommentId, Follow, Group, GroupSlug, NewComment, NewPost, Post, PostFilter, PostId,
    PostUpdate, User, Username,
};

use super::state::{CommentRow, PostRow};
use super::{InMemoryStore, StorePoisoned};

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self
            .lock()
            .map_err(|err: StorePoisoned| UserPersistenceError::query(err.to_string()))?;
        Ok(state
            .users
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupPersistenceError> {
        let state = self
            .lock()
            .map_err(|err| GroupPersistenceError::query(err.to_string()))?;
        Ok(state.groups.iter().find(|group| group.slug() == slug).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Group>, GroupPersistenceError> {
        let state = self
            .lock()
            .map_err(|err| GroupPersistenceError::query(err.to_string()))?;
        let mut groups = state.groups.clone();
        groups.sort_by(|a, b| a.title().cmp(b.title()));
        Ok(groups)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn count(&self, filter: PostFilter) -> Result<u64, PostPersistenceError> {
        let state = self
            .lock()
            .map_err(|err| PostPersistenceError::query(err.to_string()))?;
        Ok(u64::try_from(state.select(filter).len()).unwrap_or(u64::MAX))
    }

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, PostPersistenceError> {
        let state = self
            .lock()
            .map_err(|err| PostPersistenceError::query(err.to_string()))?;
        Ok(state
            .select(filter)
            .into_iter()
            .skip(to_usize(offset))
            .take(to_usize(limit))
            .filter_map(|row| state.assemble_post(row))
            .collect())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let state = self
            .lock()
            .map_err(|err| PostPersistenceError::query(err.to_string()))?;
        Ok(state
            .posts
            .iter()
            .find(|row| row.id == id)
            .and_then(|row| state.assemble_post(row)))
    }

    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut state = self
            .lock()
            .map_err(|err| PostPersistenceError::query(err.to_string()))?;
        if state.user(post.author).is_none() {
            return Err(PostPersistenceError::query(format!(
                "author {} does not exist",
                post.author
            )));
        }
        if let Some(group) = post.group.filter(|id| state.group(*id).is_none()) {
            return Err(PostPersistenceError::query(format!(
                "group {group} does not exist"
            )));
        }
        let row = PostRow {
            id: PostId::new(state.next_id()),
            author: post.author,
            text: post.text.clone(),
            pub_date: post.pub_date,
            group: post.group,
            image: post.image.clone(),
        };
        let created = state
            .assemble_post(&row)
            .ok_or_else(|| PostPersistenceError::query("author vanished during insert"))?;
        state.posts.push(row);
        Ok(created)
    }

    async fn update(
        &self,
        id: PostId,
        update: &PostUpdate,
    ) -> Result<Option<Post>, PostPersistenceError> {
        let mut state = self
            .lock()
            .map_err(|err| PostPersistenceError::query(err.to_string()))?;
        let Some(row) = state.posts.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        row.text = update.text.clone();
        row.group = update.group;
        if let Some(image) = &update.image {
            row.image = Some(image.clone());
        }
        let snapshot = row.clone();
        Ok(state.assemble_post(&snapshot))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentPersistenceError> {
        let state = self
            .lock()
            .map_err(|err| CommentPersistenceError::query(err.to_string()))?;
        let mut rows: Vec<&CommentRow> = state
            .comments
            .iter()
            .filter(|row| row.post == post)
            .collect();
        rows.sort_by_key(|row| std::cmp::Reverse((row.created, row.id)));
        Ok(rows
            .into_iter()
            .filter_map(|row| state.assemble_comment(row))
            .collect())
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut state = self
            .lock()
            .map_err(|err| CommentPersistenceError::query(err.to_string()))?;
        if !state.posts.iter().any(|row| row.id == comment.post) {
            return Err(CommentPersistenceError::query(format!(
                "post {} does not exist",
                comment.post
            )));
        }
        let row = CommentRow {
            id: CommentId::new(state.next_id()),
            post: comment.post,
            author: comment.author,
            text: comment.text.clone(),
            created: comment.created,
        };
        let created = state.assemble_comment(&row).ok_or_else(|| {
            CommentPersistenceError::query(format!("author {} does not exist", comment.author))
        })?;
        state.comments.push(row);
        Ok(created)
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn insert_if_absent(&self, follow: &Follow) -> Result<bool, FollowPersistenceError> {
        let mut state = self
            .lock()
            .map_err(|err| FollowPersistenceError::query(err.to_string()))?;
        Ok(state.follows.insert((follow.user(), follow.author())))
    }

    async fn delete(&self, follow: &Follow) -> Result<bool, FollowPersistenceError> {
        let mut state = self
            .lock()
            .map_err(|err| FollowPersistenceError::query(err.to_string()))?;
        Ok(state.follows.remove(&(follow.user(), follow.author())))
    }

    async fn exists(&self, follow: &Follow) -> Result<bool, FollowPersistenceError> {
        let state = self
            .lock()
            .map_err(|err| FollowPersistenceError::query(err.to_string()))?;
        Ok(state.follows.contains(&(follow.user(), follow.author())))
    }
}
