//! Builders wiring ports to adapters for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use yatube::domain::ports::PageCache;
use yatube::domain::{PostsPorts, PostsService};
use yatube::inbound::http::state::HttpState;
use yatube::outbound::cache::{InMemoryPageCache, NoOpPageCache};
use yatube::outbound::media::LocalImageStore;
use yatube::outbound::memory::InMemoryStore;
use yatube::outbound::persistence::{
    DieselCommentRepository, DieselFollowRepository, DieselGroupRepository,
    DieselPostRepository, DieselUserRepository,
};
use yatube::outbound::render::JsonPageRenderer;

use super::ServerConfig;

/// Assemble every port, using PostgreSQL repositories when a pool is
/// configured.
fn repository_ports(
    config: &ServerConfig,
    cache: Arc<dyn PageCache>,
    images: LocalImageStore,
) -> PostsPorts {
    let renderer = Arc::new(JsonPageRenderer);
    let images = Arc::new(images);
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            PostsPorts {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                groups: Arc::new(DieselGroupRepository::new(pool.clone())),
                posts: Arc::new(DieselPostRepository::new(pool.clone())),
                comments: Arc::new(DieselCommentRepository::new(pool.clone())),
                follows: Arc::new(DieselFollowRepository::new(pool.clone())),
                cache,
                images,
                renderer,
            }
        }
        None => {
            info!("no database configured; using in-memory repositories");
            let store = Arc::new(InMemoryStore::new());
            PostsPorts {
                users: store.clone(),
                groups: store.clone(),
                posts: store.clone(),
                comments: store.clone(),
                follows: store,
                cache,
                images,
                renderer,
            }
        }
    }
}

fn page_cache(config: &ServerConfig, clock: Arc<dyn Clock>) -> Arc<dyn PageCache> {
    if config.page_cache_enabled {
        Arc::new(InMemoryPageCache::new(clock))
    } else {
        info!("page cache disabled");
        Arc::new(NoOpPageCache)
    }
}

/// Build the shared handler state from `config`.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let cache = page_cache(config, clock.clone());
    let images = LocalImageStore::new(config.media_root.clone());
    let ports = repository_ports(config, cache, images);
    let posts = PostsService::new(ports, clock);
    web::Data::new(HttpState::new(posts, config.login_url.clone()))
}
