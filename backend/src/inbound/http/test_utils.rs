//! Test helpers for the HTTP adapter.
//!
//! Shared by unit tests and, through the `test-support` feature, by the
//! end-to-end tests under `tests/`.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::inbound::http::session_config::SESSION_COOKIE;
use crate::inbound::http::url_signer::UrlSigner;

/// Cookie session middleware with a fresh key and the `Secure` flag off.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Signer with fixed material so tests can sign paths directly.
pub fn test_url_signer() -> UrlSigner {
    UrlSigner::new(b"geocache test signer")
}

/// Session cookie set by `res`.
///
/// # Panics
/// Panics when the response does not set the session cookie.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    match res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
    {
        Some(cookie) => cookie.into_owned(),
        None => panic!("response did not set the {SESSION_COOKIE} cookie"),
    }
}
