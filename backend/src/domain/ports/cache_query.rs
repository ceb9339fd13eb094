//! Driving port for reading the cache catalogue.
//!
//! Every read takes the caller's [`Viewer`] so pending caches never leak to
//! non-admins.

use async_trait::async_trait;

use crate::domain::{Cache, CacheId, CacheWithAuthor, Error, UserId, Viewer};

/// Domain use-case port for browsing caches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheQuery: Send + Sync {
    /// Caches shown on the map: everything for admins, approved otherwise.
    async fn list_for(&self, viewer: Viewer) -> Result<Vec<Cache>, Error>;

    /// Approved caches whose name contains `needle`, ignoring case. A blank
    /// needle lists every approved cache.
    async fn search(&self, needle: &str) -> Result<Vec<Cache>, Error>;

    /// One cache joined with its author's name.
    ///
    /// Fails with `not_found` when the cache is missing or not visible.
    async fn detail(&self, viewer: Viewer, id: CacheId) -> Result<CacheWithAuthor, Error>;

    /// Caches awaiting review. Fails with `forbidden` for non-admins.
    async fn pending(&self, viewer: Viewer) -> Result<Vec<Cache>, Error>;

    /// Approved caches suggested by `author`.
    async fn hidden_by(&self, author: UserId) -> Result<Vec<Cache>, Error>;
}
