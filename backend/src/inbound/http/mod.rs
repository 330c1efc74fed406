//! HTTP inbound adapter serving the blog's HTML pages.

pub mod error;
pub mod forms;
pub mod posts;
pub mod responses;
pub mod session;
pub mod session_config;
pub mod state;

pub use error::ApiResult;
