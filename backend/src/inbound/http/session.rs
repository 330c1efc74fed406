//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The identity subsystem signs users in and stores their username in the
//! cookie session under [`USERNAME_KEY`]; this crate only reads it back.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Username};

pub(crate) const USERNAME_KEY: &str = "username";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record `username` as the signed-in user.
    pub fn persist_username(&self, username: &Username) -> Result<(), Error> {
        self.0
            .insert(USERNAME_KEY, username.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The signed-in username, if the session carries a well-formed one.
    pub fn username(&self) -> Result<Option<Username>, Error> {
        let raw = self
            .0
            .get::<String>(USERNAME_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match Username::new(value) {
            Ok(username) => Some(username),
            Err(error) => {
                warn!(%error, "invalid username in session cookie");
                None
            }
        }))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
