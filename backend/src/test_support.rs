//! Test utilities shared by unit tests in `src/` and integration tests in
//! `tests/`.
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{CacheRepository, FixtureLoginService, ProfileRepository};
use crate::domain::{
    AccountId, BookmarkService, Cache, CacheDraft, CacheId, CacheStatus, CatalogueService,
    Coordinates, DiscoveryService, NewCache, ProfileDraft, ProfileService, Rating, RatingKind,
    RawCacheDraft, UserId, UserProfile,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => panic!("failed to convert {delta:?} to TimeDelta: {error}"),
        };
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex poisoned"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Fixed instant used as "now" across tests.
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 18, 15, 45, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Profile with predictable names: `Sam{id}` / `Tester`.
pub fn sample_profile(id: i64) -> UserProfile {
    UserProfile {
        id: UserId::new(id),
        account_id: AccountId::random(),
        first_name: format!("Sam{id}"),
        last_name: "Tester".to_owned(),
        email: format!("sam{id}@example.com"),
    }
}

/// Stored cache with fixed ratings 3/2/1 near the UCSC campus.
pub fn sample_cache(id: i64, status: CacheStatus, author: i64) -> Cache {
    let rating = |kind, value| Rating::try_new(kind, value).expect("valid rating");
    Cache {
        id: CacheId::new(id),
        name: format!("Cache {id}"),
        coordinates: Coordinates::try_new(36.99, -122.06).expect("valid coordinates"),
        description: "Sample description".to_owned(),
        hint: "Sample hint".to_owned(),
        author: UserId::new(author),
        created_at: fixture_now(),
        difficulty: rating(RatingKind::Difficulty, 3),
        terrain: rating(RatingKind::Terrain, 2),
        size: rating(RatingKind::Size, 1),
        status,
    }
}

/// Register a profile named `first_name Tester` under a fresh account.
pub async fn seed_profile<R>(repo: &R, first_name: &str) -> UserId
where
    R: ProfileRepository + ?Sized,
{
    let draft = ProfileDraft::try_new(
        first_name,
        "Tester",
        &format!("{}@example.com", first_name.to_lowercase()),
    )
    .expect("valid profile draft");
    repo.insert(&AccountId::random(), &draft)
        .await
        .expect("profile stored")
        .id
}

/// Store a cache named `name` with the given status.
pub async fn seed_cache<R>(repo: &R, author: UserId, name: &str, status: CacheStatus) -> CacheId
where
    R: CacheRepository + ?Sized,
{
    let draft = CacheDraft::try_from(RawCacheDraft {
        name: name.to_owned(),
        lat: 36.99,
        long: -122.06,
        description: format!("{name} description"),
        hint: format!("{name} hint"),
        difficulty: 3,
        terrain: 2,
        size: 1,
    })
    .expect("valid cache draft");
    repo.insert(&NewCache {
        draft,
        author,
        created_at: fixture_now(),
        status,
    })
    .await
    .expect("cache stored")
    .id
}

/// HTTP state over one in-memory store, plus handles to drive it.
pub struct MemoryApp {
    /// State to register with `App::app_data`.
    pub state: HttpState,
    /// Store backing every port.
    pub store: Arc<InMemoryStore>,
    /// Clock used by the services.
    pub clock: Arc<MutableClock>,
}

/// Build handler state wired to a fresh in-memory store and a clock frozen
/// at [`fixture_now`].
pub fn memory_app() -> MemoryApp {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(MutableClock::new(fixture_now()));
    let profiles = Arc::new(ProfileService::new(store.clone(), store.clone()));
    let catalogue = Arc::new(CatalogueService::new(
        store.clone(),
        store.clone(),
        clock.clone(),
    ));
    let discoveries = Arc::new(DiscoveryService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        clock.clone(),
    ));
    let bookmarks = Arc::new(BookmarkService::new(store.clone(), store.clone()));

    let state = HttpState::new(HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        profiles: profiles.clone(),
        profile_commands: profiles,
        caches: catalogue.clone(),
        cache_commands: catalogue,
        discoveries: discoveries.clone(),
        discovery_commands: discoveries,
        bookmarks: bookmarks.clone(),
        bookmark_commands: bookmarks,
    });
    MemoryApp {
        state,
        store,
        clock,
    }
}
