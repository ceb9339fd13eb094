//! Session helpers keeping handlers free of cookie plumbing.
//!
//! The session holds two values: the authenticated account and a random salt
//! that binds signed URLs to this session. Purging the session drops both, so
//! URLs signed before logout stop verifying.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use rand::RngCore;
use tracing::warn;

use crate::domain::{AccountId, Error};

pub(crate) const ACCOUNT_KEY: &str = "account_id";
pub(crate) const SALT_KEY: &str = "signing_salt";
const SALT_BYTES: usize = 16;

/// Wrapper over the Actix session exposing account and salt operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated account, renewing the session key.
    pub fn persist_account(&self, account: &AccountId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCOUNT_KEY, account.to_string())
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))
    }

    /// Authenticated account, if any.
    ///
    /// A malformed value is logged and treated as logged out.
    pub fn account_id(&self) -> Result<Option<AccountId>, Error> {
        let raw = self
            .0
            .get::<String>(ACCOUNT_KEY)
            .map_err(|err| Error::internal(format!("failed to read session: {err}")))?;
        Ok(raw.and_then(|value| match AccountId::new(&value) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(error = %err, "discarding malformed account id in session");
                None
            }
        }))
    }

    /// Authenticated account or `401 Unauthorized`.
    pub fn require_account(&self) -> Result<AccountId, Error> {
        self.account_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Salt for URLs signed in this session, if one has been issued.
    pub fn signing_salt(&self) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(SALT_KEY)
            .map_err(|err| Error::internal(format!("failed to read session: {err}")))
    }

    /// Salt for this session, generating and storing one on first use.
    pub fn ensure_signing_salt(&self) -> Result<String, Error> {
        if let Some(salt) = self.signing_salt()? {
            return Ok(salt);
        }
        let mut bytes = [0_u8; SALT_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let salt = hex::encode(bytes);
        self.0
            .insert(SALT_KEY, &salt)
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))?;
        Ok(salt)
    }

    /// Drop every session value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
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
