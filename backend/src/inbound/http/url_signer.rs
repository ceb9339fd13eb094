//! Signed URLs tying state-changing requests to the session that was handed
//! the link.
//!
//! A signature covers the request path plus a random salt stored in the
//! session, keyed with a secret derived from the session cookie key. Query
//! parameters other than `_signature` are not covered, so a signed
//! `/generateCacheURL` can be reused with any `cache_id`, while
//! `/setBookmarked/7` cannot be replayed as `/setBookmarked/8`.
//!
//! ```text
//! GET /map                       -> {"generate_cache_url": "/generateCacheURL?_signature=…"}
//! GET /generateCacheURL?_signature=…&cache_id=7
//! ```

use actix_web::cookie::Key;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::session_config::fingerprint::fingerprint;

/// Query parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "_signature";

const SECRET_LABEL: &[u8] = b"geocache url signer v1";

/// Issues and verifies session-bound URL signatures.
#[derive(Clone)]
pub struct UrlSigner {
    secret: Zeroizing<[u8; 32]>,
}

impl UrlSigner {
    /// Derive a signer from raw secret material.
    ///
    /// # Examples
    /// ```
    /// use geocache::inbound::http::url_signer::UrlSigner;
    ///
    /// let signer = UrlSigner::new(b"correct horse battery staple");
    /// let sig = signer.sign("salt", "/logCache/3");
    /// assert!(signer.verify("salt", "/logCache/3", &sig));
    /// assert!(!signer.verify("salt", "/logCache/4", &sig));
    /// ```
    pub fn new(material: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(SECRET_LABEL);
        hasher.update(material);
        Self {
            secret: Zeroizing::new(hasher.finalize().into()),
        }
    }

    /// Derive a signer from the cookie session key.
    pub fn from_key(key: &Key) -> Self {
        Self::new(key.signing())
    }

    /// Short hex fingerprint of the signing secret for startup logs.
    pub fn fingerprint(&self) -> String {
        fingerprint(self.secret.as_slice())
    }

    /// Hex signature of `path` for the session holding `salt`.
    ///
    /// The digest is `SHA-256(secret || SHA-256(secret || salt || 0x00 || path))`.
    /// This nests the key the way HMAC does but is not RFC 2104 HMAC: there
    /// is no block-size padding and no ipad/opad. Signatures only need to
    /// verify against this same function.
    pub fn sign(&self, salt: &str, path: &str) -> String {
        let mut inner = Sha256::new();
        inner.update(self.secret.as_slice());
        inner.update(salt.as_bytes());
        inner.update([0_u8]);
        inner.update(path.as_bytes());
        let mut outer = Sha256::new();
        outer.update(self.secret.as_slice());
        outer.update(inner.finalize());
        hex::encode(outer.finalize())
    }

    /// Whether `signature` was issued for `path` in the session holding
    /// `salt`.
    pub fn verify(&self, salt: &str, path: &str, signature: &str) -> bool {
        let expected = self.sign(salt, path);
        constant_time_eq(expected.as_bytes(), signature.as_bytes())
    }

    /// `path` with a signature for the caller's session appended.
    ///
    /// Issues a salt for the session when it has none yet.
    pub fn signed_url(&self, session: &SessionContext, path: &str) -> Result<String, Error> {
        let salt = session.ensure_signing_salt()?;
        let signature = self.sign(&salt, path);
        Ok(format!("{path}?{SIGNATURE_PARAM}={signature}"))
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn signature_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == SIGNATURE_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Extractor that rejects the request with `403 Forbidden` unless it carries
/// a valid signature for its path, and exposes the verified session.
pub struct SignedSession(pub SessionContext);

impl SignedSession {
    /// The verified session.
    pub fn session(&self) -> &SessionContext {
        &self.0
    }
}

fn verify_request(
    signer: &UrlSigner,
    session: &SessionContext,
    path: &str,
    query: &str,
) -> Result<(), Error> {
    let Some(signature) = signature_param(query) else {
        debug!(path, "request without signature");
        return Err(Error::forbidden("missing URL signature"));
    };
    let Some(salt) = session.signing_salt()? else {
        debug!(path, "signature presented without a signing session");
        return Err(Error::forbidden("invalid URL signature"));
    };
    if signer.verify(&salt, path, &signature) {
        Ok(())
    } else {
        debug!(path, "signature mismatch");
        Err(Error::forbidden("invalid URL signature"))
    }
}

impl FromRequest for SignedSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let signer = req.app_data::<web::Data<UrlSigner>>().cloned();
        let path = req.path().to_owned();
        let query = req.query_string().to_owned();
        let session = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = session.await?;
            let signer =
                signer.ok_or_else(|| Error::internal("URL signer is not configured"))?;
            verify_request(&signer, &session, &path, &query)?;
            Ok(SignedSession(session))
        })
    }
}
