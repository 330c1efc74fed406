//! PostgreSQL-backed `PostRepository` adapter.
//!
//! Listings load one page of post rows, then batch-load the referenced
//! authors and groups so a page costs three queries regardless of size.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{Group, NewPost, Post, PostFilter, PostId, PostUpdate, User};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{GroupRow, NewPostRow, PostChangeset, PostRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{follows, groups, posts, users};

/// Diesel implementation of the post storage port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostPersistenceError {
    map_basic_pool_error(error, PostPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
    map_basic_diesel_error(
        error,
        PostPersistenceError::query,
        PostPersistenceError::connection,
    )
}

fn to_sql_bound(value: u64) -> Result<i64, PostPersistenceError> {
    i64::try_from(value)
        .map_err(|_| PostPersistenceError::query(format!("page bound {value} out of range")))
}

fn apply_filter<'a>(
    query: posts::BoxedQuery<'a, Pg>,
    filter: PostFilter,
) -> posts::BoxedQuery<'a, Pg> {
    match filter {
        PostFilter::All => query,
        PostFilter::Group(group) => query.filter(posts::group_id.eq(group.get())),
        PostFilter::Author(author) => query.filter(posts::author_id.eq(author.get())),
        PostFilter::FollowedBy(user) => query.filter(
            posts::author_id.eq_any(
                follows::table
                    .filter(follows::user_id.eq(user.get()))
                    .select(follows::author_id),
            ),
        ),
    }
}

/// Load the authors and groups referenced by `rows` and build domain posts.
async fn assemble(
    conn: &mut AsyncPgConnection,
    rows: Vec<PostRow>,
) -> Result<Vec<Post>, PostPersistenceError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let author_ids: Vec<i64> = rows
        .iter()
        .map(|row| row.author_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let group_ids: Vec<i64> = rows
        .iter()
        .filter_map(|row| row.group_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let authors: HashMap<i64, User> = users::table
        .filter(users::id.eq_any(author_ids))
        .select(UserRow::as_select())
        .load(conn)
        .await
        .map_err(map_diesel_error)?
        .into_iter()
        .map(|row: UserRow| -> Result<(i64, User), String> { Ok((row.id, row.into_domain()?)) })
        .collect::<Result<_, _>>()
        .map_err(PostPersistenceError::query)?;

    let groups: HashMap<i64, Group> = if group_ids.is_empty() {
        HashMap::new()
    } else {
        groups::table
            .filter(groups::id.eq_any(group_ids))
            .select(GroupRow::as_select())
            .load(conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(|row: GroupRow| -> Result<(i64, Group), String> {
                Ok((row.id, row.into_domain()?))
            })
            .collect::<Result<_, _>>()
            .map_err(PostPersistenceError::query)?
    };

    rows.into_iter()
        .map(|row| {
            let author = authors.get(&row.author_id).cloned().ok_or_else(|| {
                PostPersistenceError::query(format!("post {} has no author", row.id))
            })?;
            let group = row.group_id.and_then(|id| groups.get(&id).cloned());
            row.into_domain(author, group)
                .map_err(PostPersistenceError::query)
        })
        .collect()
}

async fn assemble_one(
    conn: &mut AsyncPgConnection,
    row: PostRow,
) -> Result<Post, PostPersistenceError> {
    let id = row.id;
    assemble(conn, vec![row])
        .await?
        .pop()
        .ok_or_else(|| PostPersistenceError::query(format!("post {id} vanished")))
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn count(&self, filter: PostFilter) -> Result<u64, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = apply_filter(posts::table.into_boxed(), filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total)
            .map_err(|_| PostPersistenceError::query("negative post count"))
    }

    async fn list(
        &self,
        filter: PostFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, PostPersistenceError> {
        let offset = to_sql_bound(offset)?;
        let limit = to_sql_bound(limit)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostRow> = apply_filter(posts::table.into_boxed(), filter)
            .order((posts::pub_date.desc(), posts::id.desc()))
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        assemble(&mut conn, rows).await
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = posts::table
            .find(id.get())
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => assemble_one(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn create(&self, post: &NewPost) -> Result<Post, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(posts::table)
            .values(NewPostRow {
                text: post.text.as_ref(),
                pub_date: post.pub_date,
                author_id: post.author.get(),
                group_id: post.group.map(|group| group.get()),
                image: post.image.as_ref().map(|image| image.path()),
            })
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        assemble_one(&mut conn, row).await
    }

    async fn update(
        &self,
        id: PostId,
        update: &PostUpdate,
    ) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = PostChangeset {
            text: update.text.as_ref(),
            group_id: Some(update.group.map(|group| group.get())),
            image: update.image.as_ref().map(|image| image.path()),
        };
        let row = diesel::update(posts::table.find(id.get()))
            .set(&changes)
            .returning(PostRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        match row {
            Some(row) => assemble_one(&mut conn, row).await.map(Some),
            None => Ok(None),
        }
    }
}
