//! In-process store implementing every driven port.
//!
//! Used when no database is configured and throughout the test suite. All
//! state sits behind one mutex, so each port call is atomic with respect to
//! every other call; that is what makes the cooldown check-then-insert and
//! the bookmark toggle safe here.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    AdminRegistry, AdminRegistryError, BookmarkRepository, BookmarkRepositoryError,
    CacheRepository, CacheRepositoryError, DiscoveryLogRepository, DiscoveryLogRepositoryError,
    ProfileRepository, ProfileRepositoryError,
};
use crate::domain::{
    AccountId, BookmarkState, Cache, CacheFilter, CacheId, CacheStatus, CooldownPolicy,
    DiscoveryLog, DiscoveryOutcome, LogId, NewCache, NewDiscovery, ProfileDraft, UserId,
    UserProfile,
};

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    profiles: Vec<UserProfile>,
    admins: Vec<UserId>,
    caches: Vec<Cache>,
    logs: Vec<DiscoveryLog>,
    // Most recent last.
    bookmarks: Vec<(UserId, CacheId)>,
}

impl State {
    fn allocate(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn has_profile(&self, id: UserId) -> bool {
        self.profiles.iter().any(|profile| profile.id == id)
    }
}

/// Mutex-guarded in-memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }
}

#[async_trait]
impl CacheRepository for InMemoryStore {
    async fn list(&self, filter: &CacheFilter) -> Result<Vec<Cache>, CacheRepositoryError> {
        let state = self.lock().map_err(CacheRepositoryError::query)?;
        Ok(state
            .caches
            .iter()
            .filter(|cache| filter.matches(cache))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: CacheId) -> Result<Option<Cache>, CacheRepositoryError> {
        let state = self.lock().map_err(CacheRepositoryError::query)?;
        Ok(state.caches.iter().find(|cache| cache.id == id).cloned())
    }

    async fn find_many(&self, ids: &[CacheId]) -> Result<Vec<Cache>, CacheRepositoryError> {
        let state = self.lock().map_err(CacheRepositoryError::query)?;
        Ok(state
            .caches
            .iter()
            .filter(|cache| ids.contains(&cache.id))
            .cloned()
            .collect())
    }

    async fn insert(&self, cache: &NewCache) -> Result<Cache, CacheRepositoryError> {
        let mut state = self.lock().map_err(CacheRepositoryError::query)?;
        if !state.has_profile(cache.author) {
            return Err(CacheRepositoryError::missing_reference(format!(
                "user {}",
                cache.author
            )));
        }
        let id = CacheId::new(state.allocate());
        let stored = Cache::from_new(id, cache.clone());
        state.caches.push(stored.clone());
        Ok(stored)
    }

    async fn approve(&self, id: CacheId) -> Result<bool, CacheRepositoryError> {
        let mut state = self.lock().map_err(CacheRepositoryError::query)?;
        Ok(state
            .caches
            .iter_mut()
            .find(|cache| cache.id == id)
            .map(|cache| cache.status = CacheStatus::Approved)
            .is_some())
    }

    async fn delete(&self, id: CacheId) -> Result<bool, CacheRepositoryError> {
        let mut state = self.lock().map_err(CacheRepositoryError::query)?;
        let before = state.caches.len();
        state.caches.retain(|cache| cache.id != id);
        if state.caches.len() == before {
            return Ok(false);
        }
        state.logs.retain(|log| log.cache != id);
        state.bookmarks.retain(|(_, cache)| *cache != id);
        Ok(true)
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn insert(
        &self,
        account: &AccountId,
        draft: &ProfileDraft,
    ) -> Result<UserProfile, ProfileRepositoryError> {
        let mut state = self.lock().map_err(ProfileRepositoryError::query)?;
        if state
            .profiles
            .iter()
            .any(|profile| profile.account_id == *account)
        {
            return Err(ProfileRepositoryError::duplicate(account.to_string()));
        }
        let profile = UserProfile {
            id: UserId::new(state.allocate()),
            account_id: *account,
            first_name: draft.first_name().to_owned(),
            last_name: draft.last_name().to_owned(),
            email: draft.email().to_owned(),
        };
        state.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        let state = self.lock().map_err(ProfileRepositoryError::query)?;
        Ok(state.profiles.iter().find(|profile| profile.id == id).cloned())
    }

    async fn find_by_account(
        &self,
        account: &AccountId,
    ) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        let state = self.lock().map_err(ProfileRepositoryError::query)?;
        Ok(state
            .profiles
            .iter()
            .find(|profile| profile.account_id == *account)
            .cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<UserProfile>, ProfileRepositoryError> {
        let state = self.lock().map_err(ProfileRepositoryError::query)?;
        Ok(state
            .profiles
            .iter()
            .filter(|profile| ids.contains(&profile.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AdminRegistry for InMemoryStore {
    async fn is_admin(&self, user: UserId) -> Result<bool, AdminRegistryError> {
        let state = self.lock().map_err(AdminRegistryError::query)?;
        Ok(state.admins.contains(&user))
    }

    async fn grant(&self, user: UserId) -> Result<bool, AdminRegistryError> {
        let mut state = self.lock().map_err(AdminRegistryError::query)?;
        if !state.has_profile(user) {
            return Err(AdminRegistryError::unknown_user(user.get()));
        }
        if state.admins.contains(&user) {
            return Ok(false);
        }
        state.admins.push(user);
        Ok(true)
    }

    async fn revoke(&self, user: UserId) -> Result<bool, AdminRegistryError> {
        let mut state = self.lock().map_err(AdminRegistryError::query)?;
        let before = state.admins.len();
        state.admins.retain(|admin| *admin != user);
        Ok(state.admins.len() != before)
    }
}

fn latest(state: &State, logger: UserId, cache: CacheId) -> Option<DateTime<Utc>> {
    state
        .logs
        .iter()
        .filter(|log| log.logger == logger && log.cache == cache)
        .map(|log| log.discovered_at)
        .max()
}

#[async_trait]
impl DiscoveryLogRepository for InMemoryStore {
    async fn record_if_cooled_down(
        &self,
        discovery: &NewDiscovery,
        policy: &CooldownPolicy,
    ) -> Result<DiscoveryOutcome, DiscoveryLogRepositoryError> {
        let mut state = self.lock().map_err(DiscoveryLogRepositoryError::query)?;
        if !state.has_profile(discovery.logger) {
            return Err(DiscoveryLogRepositoryError::missing_reference(format!(
                "user {}",
                discovery.logger
            )));
        }
        if !state.caches.iter().any(|cache| cache.id == discovery.cache) {
            return Err(DiscoveryLogRepositoryError::missing_reference(format!(
                "cache {}",
                discovery.cache
            )));
        }

        let cooldown = policy.evaluate(
            latest(&state, discovery.logger, discovery.cache),
            discovery.discovered_at,
        );
        if cooldown.disabled {
            return Ok(DiscoveryOutcome::CoolingDown(cooldown));
        }

        let log = DiscoveryLog {
            id: LogId::new(state.allocate()),
            logger: discovery.logger,
            cache: discovery.cache,
            discovered_at: discovery.discovered_at,
        };
        state.logs.push(log.clone());
        Ok(DiscoveryOutcome::Recorded(log))
    }

    async fn latest_for(
        &self,
        logger: UserId,
        cache: CacheId,
    ) -> Result<Option<DateTime<Utc>>, DiscoveryLogRepositoryError> {
        let state = self.lock().map_err(DiscoveryLogRepositoryError::query)?;
        Ok(latest(&state, logger, cache))
    }

    async fn list_for_cache(
        &self,
        cache: CacheId,
        limit: Option<usize>,
    ) -> Result<Vec<DiscoveryLog>, DiscoveryLogRepositoryError> {
        let state = self.lock().map_err(DiscoveryLogRepositoryError::query)?;
        let mut logs: Vec<DiscoveryLog> = state
            .logs
            .iter()
            .filter(|log| log.cache == cache)
            .cloned()
            .collect();
        logs.sort_by_key(|log| (log.discovered_at, log.id));
        if let Some(limit) = limit {
            let skip = logs.len().saturating_sub(limit);
            logs.drain(..skip);
        }
        Ok(logs)
    }

    async fn list_for_logger(
        &self,
        logger: UserId,
    ) -> Result<Vec<DiscoveryLog>, DiscoveryLogRepositoryError> {
        let state = self.lock().map_err(DiscoveryLogRepositoryError::query)?;
        let mut logs: Vec<DiscoveryLog> = state
            .logs
            .iter()
            .filter(|log| log.logger == logger)
            .cloned()
            .collect();
        logs.sort_by_key(|log| std::cmp::Reverse((log.discovered_at, log.id)));
        Ok(logs)
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryStore {
    async fn toggle(
        &self,
        user: UserId,
        cache: CacheId,
    ) -> Result<BookmarkState, BookmarkRepositoryError> {
        let mut state = self.lock().map_err(BookmarkRepositoryError::query)?;
        if !state.caches.iter().any(|entry| entry.id == cache) {
            return Err(BookmarkRepositoryError::missing_reference(format!(
                "cache {cache}"
            )));
        }
        let pair = (user, cache);
        if let Some(index) = state.bookmarks.iter().position(|entry| *entry == pair) {
            state.bookmarks.remove(index);
            Ok(BookmarkState::NotBookmarked)
        } else {
            state.bookmarks.push(pair);
            Ok(BookmarkState::Bookmarked)
        }
    }

    async fn state(
        &self,
        user: UserId,
        cache: CacheId,
    ) -> Result<BookmarkState, BookmarkRepositoryError> {
        let state = self.lock().map_err(BookmarkRepositoryError::query)?;
        Ok(BookmarkState::from(state.bookmarks.contains(&(user, cache))))
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<CacheId>, BookmarkRepositoryError> {
        let state = self.lock().map_err(BookmarkRepositoryError::query)?;
        Ok(state
            .bookmarks
            .iter()
            .rev()
            .filter(|(owner, _)| *owner == user)
            .map(|(_, cache)| *cache)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_now, seed_cache, seed_profile};
    use chrono::TimeDelta;
    use rstest::rstest;

    #[tokio::test]
    async fn bookmarking_an_unknown_cache_is_a_missing_reference() {
        let store = InMemoryStore::new();
        let user = seed_profile(&store, "Ada").await;

        let err = BookmarkRepository::toggle(&store, user, CacheId::new(404))
            .await
            .expect_err("no such cache");

        assert!(matches!(err, BookmarkRepositoryError::MissingReference { .. }));
    }

    #[tokio::test]
    async fn deleting_a_cache_cascades_to_logs_and_bookmarks() {
        let store = InMemoryStore::new();
        let user = seed_profile(&store, "Ada").await;
        let cache = seed_cache(&store, user, "Porter", CacheStatus::Approved).await;
        BookmarkRepository::toggle(&store, user, cache)
            .await
            .expect("bookmark");
        store
            .record_if_cooled_down(
                &NewDiscovery {
                    logger: user,
                    cache,
                    discovered_at: fixture_now(),
                },
                &CooldownPolicy::default(),
            )
            .await
            .expect("log");

        assert!(CacheRepository::delete(&store, cache).await.expect("delete"));

        assert!(
            store
                .list_for_cache(cache, None)
                .await
                .expect("logs")
                .is_empty()
        );
        assert!(store.list_for_user(user).await.expect("bookmarks").is_empty());
        assert!(!CacheRepository::delete(&store, cache).await.expect("second delete"));
    }

    #[tokio::test]
    async fn duplicate_profiles_are_rejected() {
        let store = InMemoryStore::new();
        let account = AccountId::random();
        let draft = ProfileDraft::try_new("Ada", "Lovelace", "ada@example.com").expect("draft");
        ProfileRepository::insert(&store, &account, &draft)
            .await
            .expect("first insert");

        let err = ProfileRepository::insert(&store, &account, &draft)
            .await
            .expect_err("duplicate");
        assert!(matches!(err, ProfileRepositoryError::Duplicate { .. }));
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn grant_is_idempotent(#[case] twice: bool) {
        let store = InMemoryStore::new();
        let user = seed_profile(&store, "Ada").await;
        assert!(store.grant(user).await.expect("grant"));
        if twice {
            assert!(!store.grant(user).await.expect("regrant"));
        }
        assert!(store.is_admin(user).await.expect("membership"));
        assert!(store.revoke(user).await.expect("revoke"));
        assert!(!store.is_admin(user).await.expect("membership"));
    }

    #[tokio::test]
    async fn cooldown_blocks_inside_window() {
        let store = InMemoryStore::new();
        let user = seed_profile(&store, "Ada").await;
        let cache = seed_cache(&store, user, "Porter", CacheStatus::Approved).await;
        let policy = CooldownPolicy::default();
        let attempt = |at| NewDiscovery {
            logger: user,
            cache,
            discovered_at: at,
        };

        let first = store
            .record_if_cooled_down(&attempt(fixture_now()), &policy)
            .await
            .expect("first");
        let second = store
            .record_if_cooled_down(&attempt(fixture_now() + TimeDelta::minutes(10)), &policy)
            .await
            .expect("second");

        assert!(matches!(first, DiscoveryOutcome::Recorded(_)));
        assert!(matches!(second, DiscoveryOutcome::CoolingDown(state) if state.disabled));
    }
}
