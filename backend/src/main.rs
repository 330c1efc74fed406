//! Yatube entry-point: loads settings, prepares storage and serves HTTP.

mod server;

use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use yatube::inbound::http::session_config::{BuildMode, session_settings};
use yatube::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use yatube::settings::AppSettings;

use server::{ServerConfig, create_server};

async fn connect_database(url: &str, max_connections: u32) -> std::io::Result<DbPool> {
    let migration_url = url.to_owned();
    tokio::task::spawn_blocking(move || run_migrations(&migration_url))
        .await
        .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
        .map_err(std::io::Error::other)?;
    DbPool::new(PoolConfig::new(url).with_max_size(max_connections))
        .await
        .map_err(std::io::Error::other)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(session.key, session.cookie_secure, settings.bind_addr())
        .with_media_root(settings.media_root())
        .with_login_url(settings.login_url())
        .with_page_cache(settings.page_cache_enabled());
    if let Some(url) = settings.database_url.as_deref() {
        let pool = connect_database(url, settings.db_max_connections()).await?;
        config = config.with_db_pool(pool);
    }

    info!(bind_addr = %settings.bind_addr(), "starting yatube");
    create_server(config)?.await
}
