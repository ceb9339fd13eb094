//! Driving port for toggling bookmarks.

use async_trait::async_trait;

use crate::domain::{BookmarkState, CacheId, Error, Viewer};

/// Domain use-case port for bookmark changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkCommand: Send + Sync {
    /// Flip the caller's bookmark on a visible cache and return the new state.
    async fn toggle(&self, viewer: Viewer, cache: CacheId) -> Result<BookmarkState, Error>;
}
