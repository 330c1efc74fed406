//! PostgreSQL-backed `GroupRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GroupPersistenceError, GroupRepository};
use crate::domain::{Group, GroupSlug};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::GroupRow;
use super::pool::{DbPool, PoolError};
use super::schema::groups;

/// Diesel implementation of the group lookup port.
#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GroupPersistenceError {
    map_basic_pool_error(error, GroupPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> GroupPersistenceError {
    map_basic_diesel_error(
        error,
        GroupPersistenceError::query,
        GroupPersistenceError::connection,
    )
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = groups::table
            .filter(groups::slug.eq(slug.as_ref()))
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(GroupRow::into_domain)
            .transpose()
            .map_err(GroupPersistenceError::query)
    }

    async fn list_all(&self) -> Result<Vec<Group>, GroupPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<GroupRow> = groups::table
            .order((groups::title.asc(), groups::id.asc()))
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(GroupRow::into_domain)
            .collect::<Result<_, _>>()
            .map_err(GroupPersistenceError::query)
    }
}
