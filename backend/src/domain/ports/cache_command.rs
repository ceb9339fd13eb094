//! Driving port for changing the cache catalogue.

use async_trait::async_trait;

use crate::domain::{Cache, CacheDraft, CacheId, Error, UserId, Viewer};

/// Domain use-case port for suggesting and reviewing caches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheCommand: Send + Sync {
    /// Store a suggestion from `author`. The new cache is always pending.
    async fn suggest(&self, author: UserId, draft: CacheDraft) -> Result<Cache, Error>;

    /// Approve a cache. Approving an approved cache succeeds unchanged.
    ///
    /// Fails with `forbidden` for non-admins and `not_found` for unknown ids.
    async fn approve(&self, viewer: Viewer, id: CacheId) -> Result<(), Error>;

    /// Delete a cache along with its logs and bookmarks.
    ///
    /// Fails with `forbidden` for non-admins and `not_found` for unknown ids.
    async fn delete(&self, viewer: Viewer, id: CacheId) -> Result<(), Error>;
}
