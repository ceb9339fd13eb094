//! Bookmark service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::catalogue_service::find_visible;
use crate::domain::ports::{BookmarkCommand, BookmarkQuery, BookmarkRepository, CacheRepository};
use crate::domain::service_errors::{map_bookmark_error, map_cache_error};
use crate::domain::{BookmarkState, Cache, CacheId, Error, Viewer};

/// Bookmark service implementing the bookmark driving ports.
#[derive(Clone)]
pub struct BookmarkService<C, B> {
    caches: Arc<C>,
    bookmarks: Arc<B>,
}

impl<C, B> BookmarkService<C, B> {
    /// Create a new service over the given repositories.
    pub fn new(caches: Arc<C>, bookmarks: Arc<B>) -> Self {
        Self { caches, bookmarks }
    }
}

#[async_trait]
impl<C, B> BookmarkQuery for BookmarkService<C, B>
where
    C: CacheRepository,
    B: BookmarkRepository,
{
    async fn state(&self, viewer: Viewer, cache: CacheId) -> Result<BookmarkState, Error> {
        let user = viewer.require_user()?;
        self.bookmarks
            .state(user, cache)
            .await
            .map_err(map_bookmark_error)
    }

    async fn bookmarked_caches(&self, viewer: Viewer) -> Result<Vec<Cache>, Error> {
        let user = viewer.require_user()?;
        let ids = self
            .bookmarks
            .list_for_user(user)
            .await
            .map_err(map_bookmark_error)?;
        let mut caches = self
            .caches
            .find_many(&ids)
            .await
            .map_err(map_cache_error)?;
        caches.retain(|cache| cache.is_visible_to(&viewer));
        // Repository order is by id; restore bookmark recency.
        caches.sort_by_key(|cache| ids.iter().position(|id| *id == cache.id));
        Ok(caches)
    }
}

#[async_trait]
impl<C, B> BookmarkCommand for BookmarkService<C, B>
where
    C: CacheRepository,
    B: BookmarkRepository,
{
    async fn toggle(&self, viewer: Viewer, cache: CacheId) -> Result<BookmarkState, Error> {
        let user = viewer.require_user()?;
        find_visible(self.caches.as_ref(), viewer, cache).await?;
        let state = self
            .bookmarks
            .toggle(user, cache)
            .await
            .map_err(map_bookmark_error)?;
        info!(%user, %cache, bookmarked = state.is_bookmarked(), "bookmark toggled");
        Ok(state)
    }
}
