//! Driven port for cache persistence.

use async_trait::async_trait;

use crate::domain::{Cache, CacheFilter, CacheId, NewCache};

use super::define_port_error;

define_port_error! {
    /// Errors raised by cache repository adapters.
    pub enum CacheRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "cache repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "cache repository query failed: {message}",
        /// The author referenced by a new cache does not exist.
        MissingReference { message: String } => "cache references a missing row: {message}",
    }
}

/// Storage for caches.
///
/// Deleting a cache removes its discovery logs and bookmarks with it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheRepository: Send + Sync {
    /// List caches matching `filter`, ordered by id.
    async fn list(&self, filter: &CacheFilter) -> Result<Vec<Cache>, CacheRepositoryError>;

    /// Fetch a cache by id.
    async fn find_by_id(&self, id: CacheId) -> Result<Option<Cache>, CacheRepositoryError>;

    /// Fetch the caches among `ids` that still exist, ordered by id.
    async fn find_many(&self, ids: &[CacheId]) -> Result<Vec<Cache>, CacheRepositoryError>;

    /// Store a new cache and return it with its assigned id.
    async fn insert(&self, cache: &NewCache) -> Result<Cache, CacheRepositoryError>;

    /// Mark a cache approved. Returns `false` when no such cache exists.
    async fn approve(&self, id: CacheId) -> Result<bool, CacheRepositoryError>;

    /// Remove a cache. Returns `false` when no such cache exists.
    async fn delete(&self, id: CacheId) -> Result<bool, CacheRepositoryError>;
}
