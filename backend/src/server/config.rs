//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::Key;
use yatube::inbound::http::state::DEFAULT_LOGIN_URL;
use yatube::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) media_root: PathBuf,
    pub(crate) login_url: String,
    pub(crate) page_cache_enabled: bool,
}

impl ServerConfig {
    /// Configuration with in-memory storage, caching on, and media under
    /// `./media`.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
            db_pool: None,
            media_root: PathBuf::from("media"),
            login_url: DEFAULT_LOGIN_URL.to_owned(),
            page_cache_enabled: true,
        }
    }

    /// Persist through PostgreSQL instead of in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_media_root(mut self, media_root: impl Into<PathBuf>) -> Self {
        self.media_root = media_root.into();
        self
    }

    #[must_use]
    pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
        self.login_url = login_url.into();
        self
    }

    /// Turn the index page cache on or off.
    #[must_use]
    pub fn with_page_cache(mut self, enabled: bool) -> Self {
        self.page_cache_enabled = enabled;
        self
    }
}
