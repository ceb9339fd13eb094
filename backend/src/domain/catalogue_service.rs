//! Cache catalogue service.
//!
//! Implements [`CacheQuery`] and [`CacheCommand`]: browsing filtered by the
//! caller's access level, suggestion of new caches, and the admin review
//! transitions (approve, delete).

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    CacheCommand, CacheQuery, CacheRepository, ProfileRepository,
};
use crate::domain::service_errors::{map_cache_error, map_profile_error};
use crate::domain::{
    Cache, CacheDraft, CacheFilter, CacheId, CacheStatus, CacheWithAuthor, Error, NewCache,
    UserId, Viewer,
};

/// Fetch a cache the caller may see, or `not_found`.
pub(crate) async fn find_visible<C>(caches: &C, viewer: Viewer, id: CacheId) -> Result<Cache, Error>
where
    C: CacheRepository + ?Sized,
{
    caches
        .find_by_id(id)
        .await
        .map_err(map_cache_error)?
        .filter(|cache| cache.is_visible_to(&viewer))
        .ok_or_else(|| Error::not_found(format!("cache {id} not found")))
}

/// Catalogue service implementing the cache driving ports.
#[derive(Clone)]
pub struct CatalogueService<C, P> {
    caches: Arc<C>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<C, P> CatalogueService<C, P> {
    /// Create a new service over the given repositories.
    pub fn new(caches: Arc<C>, profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            caches,
            profiles,
            clock,
        }
    }
}

impl<C, P> CatalogueService<C, P>
where
    C: CacheRepository,
    P: ProfileRepository,
{
    async fn list(&self, filter: CacheFilter) -> Result<Vec<Cache>, Error> {
        self.caches.list(&filter).await.map_err(map_cache_error)
    }
}

#[async_trait]
impl<C, P> CacheQuery for CatalogueService<C, P>
where
    C: CacheRepository,
    P: ProfileRepository,
{
    async fn list_for(&self, viewer: Viewer) -> Result<Vec<Cache>, Error> {
        let filter = if viewer.is_admin() {
            CacheFilter::all()
        } else {
            CacheFilter::all().with_status(CacheStatus::Approved)
        };
        self.list(filter).await
    }

    async fn search(&self, needle: &str) -> Result<Vec<Cache>, Error> {
        self.list(
            CacheFilter::all()
                .with_status(CacheStatus::Approved)
                .named(needle),
        )
        .await
    }

    async fn detail(&self, viewer: Viewer, id: CacheId) -> Result<CacheWithAuthor, Error> {
        let cache = find_visible(self.caches.as_ref(), viewer, id).await?;
        let author = self
            .profiles
            .find_by_id(cache.author)
            .await
            .map_err(map_profile_error)?
            .ok_or_else(|| Error::internal(format!("author of cache {id} is missing")))?;
        Ok(CacheWithAuthor {
            cache,
            first_name: author.first_name,
            last_name: author.last_name,
        })
    }

    async fn pending(&self, viewer: Viewer) -> Result<Vec<Cache>, Error> {
        viewer.require_admin()?;
        self.list(CacheFilter::all().with_status(CacheStatus::Pending))
            .await
    }

    async fn hidden_by(&self, author: UserId) -> Result<Vec<Cache>, Error> {
        self.list(
            CacheFilter::all()
                .by_author(author)
                .with_status(CacheStatus::Approved),
        )
        .await
    }
}

#[async_trait]
impl<C, P> CacheCommand for CatalogueService<C, P>
where
    C: CacheRepository,
    P: ProfileRepository,
{
    async fn suggest(&self, author: UserId, draft: CacheDraft) -> Result<Cache, Error> {
        let new = NewCache {
            draft,
            author,
            created_at: self.clock.utc(),
            status: CacheStatus::Pending,
        };
        let cache = self.caches.insert(&new).await.map_err(map_cache_error)?;
        info!(cache_id = %cache.id, %author, "cache suggested");
        Ok(cache)
    }

    async fn approve(&self, viewer: Viewer, id: CacheId) -> Result<(), Error> {
        let admin = viewer.require_admin()?;
        if !self.caches.approve(id).await.map_err(map_cache_error)? {
            return Err(Error::not_found(format!("cache {id} not found")));
        }
        info!(cache_id = %id, %admin, "cache approved");
        Ok(())
    }

    async fn delete(&self, viewer: Viewer, id: CacheId) -> Result<(), Error> {
        let admin = viewer.require_admin()?;
        if !self.caches.delete(id).await.map_err(map_cache_error)? {
            return Err(Error::not_found(format!("cache {id} not found")));
        }
        info!(cache_id = %id, %admin, "cache deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
