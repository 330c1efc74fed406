//! Outbound adapters implementing domain ports for infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **memory**: in-process repositories for tests and database-less runs
//! - **cache**: page cache stores
//! - **media**: uploaded image storage
//! - **render**: the default page renderer
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod media;
pub mod memory;
pub mod persistence;
pub mod render;
