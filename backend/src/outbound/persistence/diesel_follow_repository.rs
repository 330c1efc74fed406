//! PostgreSQL-backed `FollowRepository` adapter.
//!
//! Pair uniqueness and the no-self-follow rule are also enforced by table
//! constraints, so concurrent follow requests cannot create duplicates.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::Follow;
use crate::domain::ports::{FollowPersistenceError, FollowRepository};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewFollowRow;
use super::pool::{DbPool, PoolError};
use super::schema::follows;

/// Diesel implementation of the follow storage port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FollowPersistenceError {
    map_basic_pool_error(error, FollowPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FollowPersistenceError {
    map_basic_diesel_error(
        error,
        FollowPersistenceError::query,
        FollowPersistenceError::connection,
    )
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn insert_if_absent(&self, follow: &Follow) -> Result<bool, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(follows::table)
            .values(NewFollowRow {
                user_id: follow.user().get(),
                author_id: follow.author().get(),
            })
            .on_conflict((follows::user_id, follows::author_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted == 1)
    }

    async fn delete(&self, follow: &Follow) -> Result<bool, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            follows::table
                .filter(follows::user_id.eq(follow.user().get()))
                .filter(follows::author_id.eq(follow.author().get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn exists(&self, follow: &Follow) -> Result<bool, FollowPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            follows::table
                .filter(follows::user_id.eq(follow.user().get()))
                .filter(follows::author_id.eq(follow.author().get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
