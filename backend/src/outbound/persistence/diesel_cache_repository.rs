//! PostgreSQL-backed `CacheRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CacheRepository, CacheRepositoryError};
use crate::domain::{Cache, CacheFilter, CacheId, NewCache};

use super::diesel_helpers::{DbFailure, classify_diesel_error, like_pattern, pool_error_message};
use super::models::{CacheRow, NewCacheRow};
use super::pool::{DbPool, PoolError};
use super::schema::caches;

/// Diesel-backed implementation of the `CacheRepository` port.
///
/// Deletion relies on `ON DELETE CASCADE` to drop the cache's logs and
/// bookmarks in the same statement.
#[derive(Clone)]
pub struct DieselCacheRepository {
    pool: DbPool,
}

impl DieselCacheRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CacheRepositoryError {
    CacheRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> CacheRepositoryError {
    match classify_diesel_error(error, "cache repository") {
        DbFailure::Connection(message) => CacheRepositoryError::connection(message),
        DbFailure::ForeignKeyViolation(constraint) => {
            CacheRepositoryError::missing_reference(constraint)
        }
        DbFailure::UniqueViolation(message) | DbFailure::Query(message) => {
            CacheRepositoryError::query(message)
        }
    }
}

fn rows_to_caches(rows: Vec<CacheRow>) -> Result<Vec<Cache>, CacheRepositoryError> {
    rows.into_iter()
        .map(Cache::try_from)
        .collect::<Result<_, _>>()
        .map_err(CacheRepositoryError::query)
}

#[async_trait]
impl CacheRepository for DieselCacheRepository {
    async fn list(&self, filter: &CacheFilter) -> Result<Vec<Cache>, CacheRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = caches::table
            .select(CacheRow::as_select())
            .order(caches::id.asc())
            .into_boxed();
        if let Some(status) = filter.status {
            query = query.filter(caches::valid.eq(status.is_approved()));
        }
        if let Some(author) = filter.author {
            query = query.filter(caches::author.eq(author.get()));
        }
        if let Some(needle) = filter.name_contains.as_deref() {
            query = query.filter(caches::cache_name.ilike(like_pattern(needle)));
        }

        let rows: Vec<CacheRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows_to_caches(rows)
    }

    async fn find_by_id(&self, id: CacheId) -> Result<Option<Cache>, CacheRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CacheRow> = caches::table
            .find(id.get())
            .select(CacheRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Cache::try_from)
            .transpose()
            .map_err(CacheRepositoryError::query)
    }

    async fn find_many(&self, ids: &[CacheId]) -> Result<Vec<Cache>, CacheRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();

        let rows: Vec<CacheRow> = caches::table
            .filter(caches::id.eq_any(raw))
            .select(CacheRow::as_select())
            .order(caches::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_caches(rows)
    }

    async fn insert(&self, cache: &NewCache) -> Result<Cache, CacheRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: CacheRow = diesel::insert_into(caches::table)
            .values(NewCacheRow::from(cache))
            .returning(CacheRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Cache::try_from(row).map_err(CacheRepositoryError::query)
    }

    async fn approve(&self, id: CacheId) -> Result<bool, CacheRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = diesel::update(caches::table.find(id.get()))
            .set(caches::valid.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: CacheId) -> Result<bool, CacheRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(caches::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_rows_are_query_errors() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, CacheRepositoryError::Query { .. }));
    }

    #[rstest]
    fn pool_failures_are_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, CacheRepositoryError::connection("timed out"));
    }
}
