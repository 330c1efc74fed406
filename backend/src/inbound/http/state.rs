//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data`; everything they do
//! goes through [`PostsService`], so they stay testable without I/O.

use crate::domain::PostsService;

/// Login page used when no other is configured.
pub const DEFAULT_LOGIN_URL: &str = "/auth/login/";

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub posts: PostsService,
    /// Where anonymous visitors of protected pages are sent.
    pub login_url: String,
}

impl HttpState {
    pub fn new(posts: PostsService, login_url: impl Into<String>) -> Self {
        Self {
            posts,
            login_url: login_url.into(),
        }
    }
}
