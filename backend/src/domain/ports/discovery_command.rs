//! Driving port for logging discoveries.

use async_trait::async_trait;

use crate::domain::{CacheId, Error, NamedDiscovery, Viewer};

/// Domain use-case port for recording discoveries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscoveryCommand: Send + Sync {
    /// Record that the caller found `cache`.
    ///
    /// Returns `None` without storing anything while the cooldown is active.
    /// Fails with `unauthorized` for anonymous viewers and `not_found` when
    /// the cache is not visible.
    async fn log_discovery(
        &self,
        viewer: Viewer,
        cache: CacheId,
    ) -> Result<Option<NamedDiscovery>, Error>;
}
