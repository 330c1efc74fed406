//! Test utilities for the yatube crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via
//! the `test-support` feature).

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

/// A 1x1 transparent GIF.
pub const SMALL_GIF: &[u8] = b"GIF89a\x01\x00\x01\x00\x80\x00\x00\xff\xff\xff\x00\x00\x00!\xf9\x04\x00\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;";

/// A clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => panic!("duration {delta:?} out of range: {error}"),
        };
        *self.lock_clock() += delta;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex poisoned"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

pub mod cap_fs {
    //! Capability-based filesystem helpers for tests.
    //!
    //! The crate never touches `std::fs` directly; tests inspect stored media
    //! through `cap_std::fs::Dir` handles as well.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Read a whole file.
    pub fn read_file(path: &Path) -> io::Result<Vec<u8>> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read(Path::new(&file_name))
    }

    /// Whether `path` exists. Unreadable parents count as absent.
    pub fn path_exists(path: &Path) -> bool {
        let Ok((parent, file_name)) = parent_and_file_name(path) else {
            return false;
        };
        Dir::open_ambient_dir(parent, ambient_authority())
            .is_ok_and(|directory| directory.exists(Path::new(&file_name)))
    }

    /// Names of the entries in a directory, sorted.
    pub fn list_dir(path: &Path) -> io::Result<Vec<String>> {
        let directory = Dir::open_ambient_dir(path, ambient_authority())?;
        let mut names = directory
            .entries()?
            .map(|entry| entry.map(|entry| entry.file_name().to_string_lossy().into_owned()))
            .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "path must name a file")
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod http {
    //! An in-memory application harness for HTTP tests.

    use std::sync::Arc;

    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
    use actix_web::{App, HttpResponse, web};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    use super::MutableClock;
    use crate::Trace;
    use crate::domain::{ApiResult, Error, PostsPorts, PostsService, Username};
    use crate::inbound::http::posts::{configure, not_found};
    use crate::inbound::http::session::SessionContext;
    use crate::inbound::http::state::{DEFAULT_LOGIN_URL, HttpState};
    use crate::outbound::cache::InMemoryPageCache;
    use crate::outbound::media::LocalImageStore;
    use crate::outbound::memory::InMemoryStore;
    use crate::outbound::render::JsonPageRenderer;

    /// Path that signs the client in as `{username}`, standing in for the
    /// identity subsystem.
    pub const SIGN_IN_PATH: &str = "/test/sign-in/{username}/";

    /// Session middleware with a fresh key and the `Secure` flag off, so
    /// plain HTTP test requests round-trip the cookie.
    pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
            .cookie_name("session".to_owned())
            .cookie_secure(false)
            .build()
    }

    async fn sign_in(
        session: SessionContext,
        username: web::Path<String>,
    ) -> ApiResult<HttpResponse> {
        let username = Username::new(username.into_inner())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        session.persist_username(&username)?;
        Ok(HttpResponse::NoContent().finish())
    }

    /// Everything an HTTP test needs: the app state plus handles on the
    /// in-memory store, the clock and the media directory.
    pub struct TestWorld {
        pub store: InMemoryStore,
        pub clock: Arc<MutableClock>,
        pub state: HttpState,
        pub media: TempDir,
    }

    impl TestWorld {
        /// A world whose clock starts at 2026-01-01T00:00:00Z.
        pub fn new() -> Self {
            let start = match Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single() {
                Some(start) => start,
                None => panic!("fixture timestamp is unambiguous"),
            };
            let clock = Arc::new(MutableClock::new(start));
            let media = match TempDir::new() {
                Ok(media) => media,
                Err(error) => panic!("create media dir: {error}"),
            };
            let store = InMemoryStore::new();
            let repositories = Arc::new(store.clone());
            let ports = PostsPorts {
                users: repositories.clone(),
                groups: repositories.clone(),
                posts: repositories.clone(),
                comments: repositories.clone(),
                follows: repositories,
                cache: Arc::new(InMemoryPageCache::new(clock.clone())),
                images: Arc::new(LocalImageStore::new(media.path())),
                renderer: Arc::new(JsonPageRenderer),
            };
            let posts = PostsService::new(ports, clock.clone());
            Self {
                store,
                clock,
                state: HttpState::new(posts, DEFAULT_LOGIN_URL),
                media,
            }
        }

        /// The full application, plus the test sign-in route.
        pub fn app(
            &self,
        ) -> App<
            impl ServiceFactory<
                ServiceRequest,
                Config = (),
                Response = ServiceResponse,
                Error = actix_web::Error,
                InitError = (),
            > + use<>,
        > {
            App::new()
                .app_data(web::Data::new(self.state.clone()))
                .wrap(test_session_middleware())
                .wrap(Trace)
                .route(SIGN_IN_PATH, web::get().to(sign_in))
                .configure(configure)
                .default_service(web::to(not_found))
        }
    }

    impl Default for TestWorld {
        fn default() -> Self {
            Self::new()
        }
    }
}
