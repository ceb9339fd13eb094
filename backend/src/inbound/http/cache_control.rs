//! Cache-control policy for per-session responses.

/// Responses tied to a session must be revalidated before reuse.
pub const PRIVATE_NO_CACHE: &str = "private, no-cache, must-revalidate";

/// Header tuple applying [`PRIVATE_NO_CACHE`].
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE)
}
