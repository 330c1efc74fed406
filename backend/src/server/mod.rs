//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use yatube::Trace;
use yatube::inbound::http::posts::{configure, not_found};
use yatube::inbound::http::state::HttpState;

fn build_app(
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // The identity service shares this cookie; Lax keeps the session on
    // top-level navigation back from the login page.
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::weeks(2)),
        )
        .build();

    App::new()
        .app_data(http_state)
        .wrap(session)
        .wrap(Trace)
        .configure(configure)
        .default_service(web::to(not_found))
}

/// Construct the Actix HTTP server for `config`.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || build_app(http_state.clone(), key.clone(), cookie_secure))
        .bind(bind_addr)?
        .run();
    Ok(server)
}
