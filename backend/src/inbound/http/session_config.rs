//! Session cookie configuration read from the environment.
//!
//! Debug builds fall back to permissive defaults with a warning. Release
//! builds require every toggle to be present and valid, and refuse ephemeral
//! keys.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `SESSION_KEY_FILE` | Path to at least 64 bytes of key material |
//! | `SESSION_COOKIE_SECURE` | Mark the cookie `Secure` |
//! | `SESSION_SAMESITE` | `Strict`, `Lax` or `None` |
//! | `SESSION_ALLOW_EPHEMERAL` | Generate a throwaway key when the file is unreadable |

pub mod fingerprint;

use std::path::PathBuf;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

use crate::inbound::http::url_signer::UrlSigner;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const DEFAULT_KEY_PATH: &str = "/var/run/secrets/session_key";
const MIN_KEY_LEN: usize = 64;
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";
/// Lifetime of an idle session.
pub const SESSION_TTL_HOURS: i64 = 2;

/// Whether validation is lenient (debug) or strict (release).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or malformed toggles fall back to defaults.
    Debug,
    /// Missing or malformed toggles are errors.
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie session settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Cookie encryption and signing key.
    pub key: Key,
    /// Whether the cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
    /// `SameSite` policy for the cookie.
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Cookie session middleware for these settings.
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }

    /// URL signer keyed from the session key.
    pub fn url_signer(&self) -> UrlSigner {
        UrlSigner::from_key(&self.key)
    }
}

/// Session configuration failures.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Required variable absent.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Variable name.
        name: &'static str,
    },
    /// Variable present with an unusable value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Value found.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
    /// Key file unreadable.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Key file shorter than [`MIN_KEY_LEN`] bytes.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        /// Key file path.
        path: PathBuf,
        /// Bytes read.
        length: usize,
        /// Bytes required.
        min_len: usize,
    },
    /// `SameSite=None` without a secure cookie.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral keys requested in a release build.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate session settings.
///
/// # Examples
/// ```
/// use geocache::inbound::http::session_config::{BuildMode, session_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|_| None);
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = read_flag(env, mode, COOKIE_SECURE_ENV, true)?;
    let same_site = read_same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = read_flag(env, mode, ALLOW_EPHEMERAL_ENV, false)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = read_key(env, mode, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// In debug builds log `warning` and use `fallback`; in release builds fail.
fn lenient<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warning: &str,
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn!(%error, "{warning}");
        Ok(fallback)
    } else {
        Err(error)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn read_flag<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return lenient(
            mode,
            default,
            SessionConfigError::MissingEnv { name },
            "session toggle not set; using default",
        );
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => lenient(
            mode,
            default,
            SessionConfigError::InvalidEnv {
                name,
                value,
                expected: BOOL_EXPECTED,
            },
            "session toggle invalid; using default",
        ),
    }
}

fn read_same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        return lenient(
            mode,
            default,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
            "SameSite policy not set; using default",
        );
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "strict" => Ok(SameSite::Strict),
        "lax" => Ok(SameSite::Lax),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => lenient(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
            "browsers may reject SameSite=None cookies without Secure",
        ),
        _ => lenient(
            mode,
            default,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value,
                expected: SAMESITE_EXPECTED,
            },
            "SameSite policy invalid; using default",
        ),
    }
}

fn read_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| DEFAULT_KEY_PATH.to_owned()),
    );
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < MIN_KEY_LEN {
                bytes.zeroize();
                return lenient(
                    mode,
                    Key::generate(),
                    SessionConfigError::KeyTooShort {
                        path,
                        length,
                        min_len: MIN_KEY_LEN,
                    },
                    "session key too short; using an ephemeral key",
                );
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "session key unreadable; using an ephemeral key"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}
