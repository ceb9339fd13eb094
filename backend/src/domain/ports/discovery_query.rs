//! Driving port for reading discovery logs.

use async_trait::async_trait;

use crate::domain::{Activity, CacheId, CooldownState, Error, NamedDiscovery, UserId, Viewer};

/// Domain use-case port for discovery reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscoveryQuery: Send + Sync {
    /// Cooldown state of the caller for `cache`.
    ///
    /// Fails with `unauthorized` for anonymous viewers and `not_found` when
    /// the cache is not visible.
    async fn check_timer(&self, viewer: Viewer, cache: CacheId) -> Result<CooldownState, Error>;

    /// Logs of a visible cache with logger names, oldest first.
    async fn logs_for_cache(
        &self,
        viewer: Viewer,
        cache: CacheId,
        limit: Option<usize>,
    ) -> Result<Vec<NamedDiscovery>, Error>;

    /// Logs recorded by `user` with cache names, newest first.
    async fn activity(&self, user: UserId) -> Result<Vec<Activity>, Error>;
}
