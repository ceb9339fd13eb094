//! Driven port for discovery logs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CacheId, CooldownPolicy, DiscoveryLog, DiscoveryOutcome, NewDiscovery, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by discovery log adapters.
    pub enum DiscoveryLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "log repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "log repository query failed: {message}",
        /// The logger or cache does not exist.
        MissingReference { message: String } => "log references a missing row: {message}",
    }
}

/// Append-only storage for discovery logs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscoveryLogRepository: Send + Sync {
    /// Evaluate `policy` against the logger's most recent log of the cache
    /// and insert `discovery` only when it allows.
    ///
    /// The read and the insert happen atomically with respect to other calls
    /// for the same logger, so two concurrent attempts cannot both succeed
    /// inside one cooldown window.
    async fn record_if_cooled_down(
        &self,
        discovery: &NewDiscovery,
        policy: &CooldownPolicy,
    ) -> Result<DiscoveryOutcome, DiscoveryLogRepositoryError>;

    /// Timestamp of the logger's most recent log of `cache`.
    async fn latest_for(
        &self,
        logger: UserId,
        cache: CacheId,
    ) -> Result<Option<DateTime<Utc>>, DiscoveryLogRepositoryError>;

    /// Logs of `cache`, oldest first. With `limit`, only the most recent
    /// `limit` entries are returned, still oldest first.
    async fn list_for_cache(
        &self,
        cache: CacheId,
        limit: Option<usize>,
    ) -> Result<Vec<DiscoveryLog>, DiscoveryLogRepositoryError>;

    /// Logs recorded by `logger`, newest first.
    async fn list_for_logger(
        &self,
        logger: UserId,
    ) -> Result<Vec<DiscoveryLog>, DiscoveryLogRepositoryError>;
}
