//! Builders wiring repositories into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use geocache::domain::ports::{
    AdminRegistry, BookmarkRepository, CacheRepository, DiscoveryLogRepository,
    FixtureLoginService, ProfileRepository,
};
use geocache::domain::{BookmarkService, CatalogueService, DiscoveryService, ProfileService};
use geocache::inbound::http::state::{HttpState, HttpStatePorts};
use geocache::outbound::memory::InMemoryStore;
use geocache::outbound::persistence::{
    DbPool, DieselAdminRegistry, DieselBookmarkRepository, DieselCacheRepository,
    DieselDiscoveryLogRepository, DieselProfileRepository,
};

use super::ServerConfig;

/// One implementation per driven port.
pub(super) struct Repositories<P, A, C, L, B> {
    pub(super) profiles: Arc<P>,
    pub(super) admins: Arc<A>,
    pub(super) caches: Arc<C>,
    pub(super) logs: Arc<L>,
    pub(super) bookmarks: Arc<B>,
}

impl Repositories<InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore, InMemoryStore> {
    fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            profiles: store.clone(),
            admins: store.clone(),
            caches: store.clone(),
            logs: store.clone(),
            bookmarks: store,
        }
    }
}

impl
    Repositories<
        DieselProfileRepository,
        DieselAdminRegistry,
        DieselCacheRepository,
        DieselDiscoveryLogRepository,
        DieselBookmarkRepository,
    >
{
    fn diesel(pool: &DbPool) -> Self {
        Self {
            profiles: Arc::new(DieselProfileRepository::new(pool.clone())),
            admins: Arc::new(DieselAdminRegistry::new(pool.clone())),
            caches: Arc::new(DieselCacheRepository::new(pool.clone())),
            logs: Arc::new(DieselDiscoveryLogRepository::new(pool.clone())),
            bookmarks: Arc::new(DieselBookmarkRepository::new(pool.clone())),
        }
    }
}

/// Build the domain services over `repos` and expose them as HTTP ports.
///
/// Logins go through [`FixtureLoginService`] whichever store is selected;
/// accounts belong to the identity provider, not to this database.
pub(super) fn wire_http_state<P, A, C, L, B>(
    repos: Repositories<P, A, C, L, B>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    P: ProfileRepository + 'static,
    A: AdminRegistry + 'static,
    C: CacheRepository + 'static,
    L: DiscoveryLogRepository + 'static,
    B: BookmarkRepository + 'static,
{
    let Repositories {
        profiles,
        admins,
        caches,
        logs,
        bookmarks,
    } = repos;

    let profile_service = Arc::new(ProfileService::new(profiles.clone(), admins));
    let catalogue = Arc::new(CatalogueService::new(
        caches.clone(),
        profiles.clone(),
        clock.clone(),
    ));
    let discoveries = Arc::new(DiscoveryService::new(caches.clone(), logs, profiles, clock));
    let bookmark_service = Arc::new(BookmarkService::new(caches, bookmarks));

    HttpState::new(HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        profiles: profile_service.clone(),
        profile_commands: profile_service,
        caches: catalogue.clone(),
        cache_commands: catalogue,
        discoveries: discoveries.clone(),
        discovery_commands: discoveries,
        bookmarks: bookmark_service.clone(),
        bookmark_commands: bookmark_service,
    })
}

/// Build the shared HTTP state, backed by PostgreSQL when a pool is
/// configured and by a process-local store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => wire_http_state(Repositories::diesel(pool), clock),
        None => wire_http_state(
            Repositories::in_memory(Arc::new(InMemoryStore::new())),
            clock,
        ),
    };
    web::Data::new(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocache::domain::{AccountId, LoginCredentials, ProfileDraft, Viewer};
    use geocache::test_support::{MutableClock, fixture_now};
    use rstest::rstest;

    fn memory_state() -> (HttpState, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let state = wire_http_state(
            Repositories::in_memory(store.clone()),
            Arc::new(MutableClock::new(fixture_now())),
        );
        (state, store)
    }

    #[rstest]
    #[tokio::test]
    async fn wired_ports_share_one_store() {
        let (state, store) = memory_state();
        let credentials =
            LoginCredentials::try_from_parts("ranger", "trailhead").expect("credentials shape");
        let account: AccountId = state
            .login
            .authenticate(&credentials)
            .await
            .expect("fixture login");

        let draft = ProfileDraft::try_new("Ranger", "Rick", "rick@example.com").expect("draft");
        let profile = state
            .profile_commands
            .register(&account, draft)
            .await
            .expect("registered");
        store.grant(profile.id).await.expect("grant admin");

        assert_eq!(
            state.profiles.viewer_for(&account).await.expect("viewer"),
            Viewer::Admin(profile.id)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_accounts_are_anonymous() {
        let (state, _) = memory_state();
        let credentials =
            LoginCredentials::try_from_parts("admin", "password").expect("credentials shape");
        let account = state
            .login
            .authenticate(&credentials)
            .await
            .expect("fixture login");

        assert_eq!(
            state.profiles.viewer_for(&account).await.expect("viewer"),
            Viewer::Anonymous
        );
    }
}
