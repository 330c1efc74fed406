//! PostgreSQL persistence adapters built on Diesel.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) stay private
//! to this module; repositories translate them into domain types and map
//! driver failures onto each port's `Connection`/`Query` errors.
//!
//! ```ignore
//! use yatube::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/yatube")).await?;
//! let posts = DieselPostRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_comment_repository;
mod diesel_follow_repository;
mod diesel_group_repository;
mod diesel_post_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_follow_repository::DieselFollowRepository;
pub use diesel_group_repository::DieselGroupRepository;
pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbConnection, DbPool, PoolConfig, PoolError};
