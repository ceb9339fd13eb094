//! Driven port for bookmarks.

use async_trait::async_trait;

use crate::domain::{BookmarkState, CacheId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by bookmark repository adapters.
    pub enum BookmarkRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "bookmark repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "bookmark repository query failed: {message}",
        /// The profile or cache of the pair does not exist.
        MissingReference { message: String } => "bookmark references a missing row: {message}",
    }
}

/// Storage for unique (profile, cache) bookmark pairs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Flip the pair atomically and return the resulting state.
    async fn toggle(
        &self,
        user: UserId,
        cache: CacheId,
    ) -> Result<BookmarkState, BookmarkRepositoryError>;

    /// Current state of the pair.
    async fn state(
        &self,
        user: UserId,
        cache: CacheId,
    ) -> Result<BookmarkState, BookmarkRepositoryError>;

    /// Caches bookmarked by `user`, most recent first.
    async fn list_for_user(&self, user: UserId) -> Result<Vec<CacheId>, BookmarkRepositoryError>;
}
