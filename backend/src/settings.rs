//! Application configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `YATUBE_*` environment variables and an
//! optional configuration file. Unset values fall back to the defaults below.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::inbound::http::state::DEFAULT_LOGIN_URL;

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::V4(std::net::SocketAddrV4::new(
    std::net::Ipv4Addr::UNSPECIFIED,
    8080,
));
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "YATUBE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection URL. Without one, data lives in memory.
    pub database_url: Option<String>,
    /// Directory receiving uploaded images.
    pub media_root: Option<PathBuf>,
    /// Login page for anonymous visitors of protected pages.
    pub login_url: Option<String>,
    /// File holding the session signing key (at least 64 bytes).
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`. Defaults to on.
    pub cookie_secure: Option<bool>,
    /// Use a generated session key when the key file is missing.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Serve the index listing through the page cache. Defaults to on.
    pub page_cache_enabled: Option<bool>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    pub fn media_root(&self) -> &Path {
        self.media_root
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_MEDIA_ROOT))
    }

    pub fn login_url(&self) -> &str {
        self.login_url.as_deref().unwrap_or(DEFAULT_LOGIN_URL)
    }

    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn page_cache_enabled(&self) -> bool {
        self.page_cache_enabled.unwrap_or(true)
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}
