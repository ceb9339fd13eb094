//! PostgreSQL-backed `BookmarkRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{BookmarkRepository, BookmarkRepositoryError};
use crate::domain::{BookmarkState, CacheId, UserId};

use super::diesel_helpers::{DbFailure, classify_diesel_error, pool_error_message};
use super::models::NewBookmarkRow;
use super::pool::{DbPool, PoolError};
use super::schema::bookmarks;

/// Diesel-backed implementation of the `BookmarkRepository` port.
///
/// Toggling deletes the pair if present and inserts it otherwise, inside one
/// transaction. The `(user_id, cache_id)` unique constraint absorbs a racing
/// insert: a conflicting pair means the cache is already bookmarked.
#[derive(Clone)]
pub struct DieselBookmarkRepository {
    pool: DbPool,
}

impl DieselBookmarkRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookmarkRepositoryError {
    BookmarkRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> BookmarkRepositoryError {
    match classify_diesel_error(error, "bookmark repository") {
        DbFailure::Connection(message) => BookmarkRepositoryError::connection(message),
        DbFailure::ForeignKeyViolation(constraint) => {
            BookmarkRepositoryError::missing_reference(constraint)
        }
        DbFailure::UniqueViolation(message) | DbFailure::Query(message) => {
            BookmarkRepositoryError::query(message)
        }
    }
}

#[async_trait]
impl BookmarkRepository for DieselBookmarkRepository {
    async fn toggle(
        &self,
        user: UserId,
        cache: CacheId,
    ) -> Result<BookmarkState, BookmarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let removed = diesel::delete(
                    bookmarks::table
                        .filter(bookmarks::user_id.eq(user.get()))
                        .filter(bookmarks::cache_id.eq(cache.get())),
                )
                .execute(conn)
                .await?;
                if removed > 0 {
                    return Ok(BookmarkState::NotBookmarked);
                }

                diesel::insert_into(bookmarks::table)
                    .values(&NewBookmarkRow {
                        user_id: user.get(),
                        cache_id: cache.get(),
                    })
                    .on_conflict((bookmarks::user_id, bookmarks::cache_id))
                    .do_nothing()
                    .execute(conn)
                    .await?;
                Ok(BookmarkState::Bookmarked)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn state(
        &self,
        user: UserId,
        cache: CacheId,
    ) -> Result<BookmarkState, BookmarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let present: bool = diesel::select(exists(
            bookmarks::table
                .filter(bookmarks::user_id.eq(user.get()))
                .filter(bookmarks::cache_id.eq(cache.get())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(BookmarkState::from(present))
    }

    async fn list_for_user(&self, user: UserId) -> Result<Vec<CacheId>, BookmarkRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids: Vec<i64> = bookmarks::table
            .filter(bookmarks::user_id.eq(user.get()))
            .order((bookmarks::created_at.desc(), bookmarks::id.desc()))
            .select(bookmarks::cache_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(CacheId::new).collect())
    }
}
