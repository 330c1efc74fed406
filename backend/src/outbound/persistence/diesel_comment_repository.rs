//! PostgreSQL-backed `CommentRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{Comment, NewComment, PostId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CommentRow, NewCommentRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel implementation of the comment storage port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentPersistenceError {
    map_basic_pool_error(error, CommentPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentPersistenceError {
    map_basic_diesel_error(
        error,
        CommentPersistenceError::query,
        CommentPersistenceError::connection,
    )
}

fn into_comment(row: CommentRow, author: UserRow) -> Result<Comment, CommentPersistenceError> {
    let author = author
        .into_domain()
        .map_err(CommentPersistenceError::query)?;
    row.into_domain(author)
        .map_err(CommentPersistenceError::query)
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn list_for_post(&self, post: PostId) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(CommentRow, UserRow)> = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post.get()))
            .order((comments::created.desc(), comments::id.desc()))
            .select((CommentRow::as_select(), UserRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, author)| into_comment(row, author))
            .collect()
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(comments::table)
            .values(NewCommentRow {
                post_id: comment.post.get(),
                author_id: comment.author.get(),
                text: comment.text.as_ref(),
                created: comment.created,
            })
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let author = users::table
            .find(row.author_id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        into_comment(row, author)
    }
}
