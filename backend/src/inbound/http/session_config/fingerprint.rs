//! Short fingerprints of secret material.
//!
//! Startup logs print fingerprints of the cookie key and the URL signing
//! secret so operators can tell which keys a replica runs with.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of the SHA-256 of `material`, hex encoded.
///
/// # Examples
/// ```
/// use geocache::inbound::http::session_config::fingerprint::fingerprint;
///
/// let fp = fingerprint(b"secret");
/// assert_eq!(fp.len(), 16);
/// assert_eq!(fp, fingerprint(b"secret"));
/// ```
#[must_use]
pub fn fingerprint(material: &[u8]) -> String {
    let digest = Sha256::digest(material);
    hex::encode(digest.iter().take(FINGERPRINT_BYTES).copied().collect::<Vec<u8>>())
}

/// Fingerprint of the signing half of a cookie key.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    fingerprint(key.signing())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fingerprint_is_short_lowercase_hex() {
        let fp = key_fingerprint(&Key::generate());
        assert_eq!(fp.len(), FINGERPRINT_BYTES * 2);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[rstest]
    fn derived_keys_fingerprint_deterministically() {
        let material = [b'k'; 64];
        assert_eq!(
            key_fingerprint(&Key::derive_from(&material)),
            key_fingerprint(&Key::derive_from(&material))
        );
        assert_ne!(
            key_fingerprint(&Key::derive_from(&material)),
            key_fingerprint(&Key::derive_from(&[b'j'; 64]))
        );
    }
}
