//! Driving port for reading bookmarks.

use async_trait::async_trait;

use crate::domain::{BookmarkState, Cache, CacheId, Error, Viewer};

/// Domain use-case port for bookmark reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkQuery: Send + Sync {
    /// Whether the caller bookmarked `cache`.
    async fn state(&self, viewer: Viewer, cache: CacheId) -> Result<BookmarkState, Error>;

    /// Visible caches bookmarked by the caller, most recent first.
    async fn bookmarked_caches(&self, viewer: Viewer) -> Result<Vec<Cache>, Error>;
}
