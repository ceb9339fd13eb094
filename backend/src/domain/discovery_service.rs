//! Discovery service: cooldown-guarded logging and log listings.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::catalogue_service::find_visible;
use crate::domain::ports::{
    CacheRepository, DiscoveryCommand, DiscoveryLogRepository, DiscoveryQuery, ProfileRepository,
};
use crate::domain::service_errors::{map_cache_error, map_log_error, map_profile_error};
use crate::domain::{
    Activity, CacheId, CooldownPolicy, CooldownState, DiscoveryLog, DiscoveryOutcome, Error,
    NamedDiscovery, NewDiscovery, UserId, Viewer,
};

/// Discovery service implementing the discovery driving ports.
#[derive(Clone)]
pub struct DiscoveryService<C, L, P> {
    caches: Arc<C>,
    logs: Arc<L>,
    profiles: Arc<P>,
    clock: Arc<dyn Clock>,
    policy: CooldownPolicy,
}

impl<C, L, P> DiscoveryService<C, L, P> {
    /// Create a new service using the default cooldown.
    pub fn new(caches: Arc<C>, logs: Arc<L>, profiles: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            caches,
            logs,
            profiles,
            clock,
            policy: CooldownPolicy::default(),
        }
    }

    /// Replace the cooldown policy.
    #[must_use]
    pub fn with_policy(mut self, policy: CooldownPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl<C, L, P> DiscoveryService<C, L, P>
where
    C: CacheRepository,
    L: DiscoveryLogRepository,
    P: ProfileRepository,
{
    async fn with_names(&self, logs: Vec<DiscoveryLog>) -> Result<Vec<NamedDiscovery>, Error> {
        let mut ids: Vec<UserId> = logs.iter().map(|log| log.logger).collect();
        ids.sort_unstable();
        ids.dedup();
        let names: HashMap<UserId, (String, String)> = self
            .profiles
            .find_many(&ids)
            .await
            .map_err(map_profile_error)?
            .into_iter()
            .map(|profile| (profile.id, (profile.first_name, profile.last_name)))
            .collect();

        Ok(logs
            .into_iter()
            .map(|log| {
                let (first_name, last_name) = names.get(&log.logger).cloned().unwrap_or_default();
                NamedDiscovery {
                    log,
                    first_name,
                    last_name,
                }
            })
            .collect())
    }
}

#[async_trait]
impl<C, L, P> DiscoveryQuery for DiscoveryService<C, L, P>
where
    C: CacheRepository,
    L: DiscoveryLogRepository,
    P: ProfileRepository,
{
    async fn check_timer(&self, viewer: Viewer, cache: CacheId) -> Result<CooldownState, Error> {
        let user = viewer.require_user()?;
        find_visible(self.caches.as_ref(), viewer, cache).await?;
        let last = self
            .logs
            .latest_for(user, cache)
            .await
            .map_err(map_log_error)?;
        Ok(self.policy.evaluate(last, self.clock.utc()))
    }

    async fn logs_for_cache(
        &self,
        viewer: Viewer,
        cache: CacheId,
        limit: Option<usize>,
    ) -> Result<Vec<NamedDiscovery>, Error> {
        find_visible(self.caches.as_ref(), viewer, cache).await?;
        let logs = self
            .logs
            .list_for_cache(cache, limit)
            .await
            .map_err(map_log_error)?;
        self.with_names(logs).await
    }

    async fn activity(&self, user: UserId) -> Result<Vec<Activity>, Error> {
        let logs = self
            .logs
            .list_for_logger(user)
            .await
            .map_err(map_log_error)?;
        let mut ids: Vec<CacheId> = logs.iter().map(|log| log.cache).collect();
        ids.sort_unstable();
        ids.dedup();
        let names: HashMap<CacheId, String> = self
            .caches
            .find_many(&ids)
            .await
            .map_err(map_cache_error)?
            .into_iter()
            .map(|cache| (cache.id, cache.name))
            .collect();

        Ok(logs
            .into_iter()
            .filter_map(|log| {
                let cache_name = names.get(&log.cache)?.clone();
                Some(Activity { log, cache_name })
            })
            .collect())
    }
}

#[async_trait]
impl<C, L, P> DiscoveryCommand for DiscoveryService<C, L, P>
where
    C: CacheRepository,
    L: DiscoveryLogRepository,
    P: ProfileRepository,
{
    async fn log_discovery(
        &self,
        viewer: Viewer,
        cache: CacheId,
    ) -> Result<Option<NamedDiscovery>, Error> {
        let logger = viewer.require_user()?;
        find_visible(self.caches.as_ref(), viewer, cache).await?;
        let discovery = NewDiscovery {
            logger,
            cache,
            discovered_at: self.clock.utc(),
        };

        match self
            .logs
            .record_if_cooled_down(&discovery, &self.policy)
            .await
            .map_err(map_log_error)?
        {
            DiscoveryOutcome::Recorded(log) => {
                info!(log_id = %log.id, %logger, %cache, "discovery logged");
                Ok(self.with_names(vec![log]).await?.pop())
            }
            DiscoveryOutcome::CoolingDown(state) => {
                debug!(%logger, %cache, refresh_time = %state.refresh_time, "discovery still cooling down");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
#[path = "discovery_service_tests.rs"]
mod tests;
