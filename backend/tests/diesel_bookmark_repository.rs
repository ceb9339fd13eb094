//! Integration tests for `DieselBookmarkRepository` against embedded
//! PostgreSQL: the transactional toggle and its unique-pair guard.

use geocache::domain::ports::{BookmarkRepository, BookmarkRepositoryError};
use geocache::domain::{BookmarkState, CacheId, CacheStatus, UserId};
use geocache::outbound::persistence::{
    DieselBookmarkRepository, DieselCacheRepository, DieselProfileRepository,
};
use geocache::test_support::{seed_cache, seed_profile};
use rstest::{fixture, rstest};

mod support;

use support::{TestDatabase, test_database};

struct BookmarkContext {
    db: TestDatabase,
    bookmarks: DieselBookmarkRepository,
    user: UserId,
    cache: CacheId,
}

#[fixture]
fn bookmark_context() -> Option<BookmarkContext> {
    let db = test_database()?;
    let profiles = DieselProfileRepository::new(db.pool.clone());
    let caches = DieselCacheRepository::new(db.pool.clone());
    let (user, cache) = db.block_on(async {
        let user = seed_profile(&profiles, "Ada").await;
        let cache = seed_cache(&caches, user, "Porter", CacheStatus::Approved).await;
        (user, cache)
    });
    let bookmarks = DieselBookmarkRepository::new(db.pool.clone());
    Some(BookmarkContext {
        db,
        bookmarks,
        user,
        cache,
    })
}

fn stored_pairs(ctx: &BookmarkContext) -> usize {
    ctx.db
        .block_on(ctx.bookmarks.list_for_user(ctx.user))
        .expect("list bookmarks")
        .len()
}

#[rstest]
#[case(1, BookmarkState::Bookmarked)]
#[case(2, BookmarkState::NotBookmarked)]
#[case(3, BookmarkState::Bookmarked)]
fn toggling_flips_one_stored_pair(
    bookmark_context: Option<BookmarkContext>,
    #[case] toggles: usize,
    #[case] expected: BookmarkState,
) {
    let Some(ctx) = bookmark_context else {
        eprintln!("SKIP-TEST-CLUSTER: toggling_flips_one_stored_pair skipped");
        return;
    };

    let mut last = BookmarkState::NotBookmarked;
    for _ in 0..toggles {
        last = ctx
            .db
            .block_on(ctx.bookmarks.toggle(ctx.user, ctx.cache))
            .expect("toggle");
    }

    assert_eq!(last, expected);
    let state = ctx
        .db
        .block_on(ctx.bookmarks.state(ctx.user, ctx.cache))
        .expect("state");
    assert_eq!(state, expected);
    assert_eq!(stored_pairs(&ctx), usize::from(expected.is_bookmarked()));
}

#[rstest]
fn racing_toggles_never_duplicate_the_pair(bookmark_context: Option<BookmarkContext>) {
    let Some(ctx) = bookmark_context else {
        eprintln!("SKIP-TEST-CLUSTER: racing_toggles_never_duplicate_the_pair skipped");
        return;
    };

    let (first, second) = ctx.db.block_on(async {
        tokio::join!(
            ctx.bookmarks.toggle(ctx.user, ctx.cache),
            ctx.bookmarks.toggle(ctx.user, ctx.cache),
        )
    });
    first.expect("first toggle");
    second.expect("second toggle");

    let pairs = stored_pairs(&ctx);
    assert!(pairs <= 1, "pair stored {pairs} times");
    let state = ctx
        .db
        .block_on(ctx.bookmarks.state(ctx.user, ctx.cache))
        .expect("state");
    assert_eq!(usize::from(state.is_bookmarked()), pairs);
}

#[rstest]
fn bookmarking_a_missing_cache_is_a_missing_reference(
    bookmark_context: Option<BookmarkContext>,
) {
    let Some(ctx) = bookmark_context else {
        eprintln!("SKIP-TEST-CLUSTER: bookmarking_a_missing_cache_is_a_missing_reference skipped");
        return;
    };

    let err = ctx
        .db
        .block_on(ctx.bookmarks.toggle(ctx.user, CacheId::new(9_999)))
        .expect_err("no such cache");

    assert!(matches!(err, BookmarkRepositoryError::MissingReference { .. }));
}
