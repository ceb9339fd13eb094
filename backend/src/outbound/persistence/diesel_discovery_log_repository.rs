//! PostgreSQL-backed `DiscoveryLogRepository` implementation using Diesel ORM.
//!
//! The cooldown check and the insert run in one transaction that first locks
//! the logger's `users` row. Concurrent attempts by the same logger therefore
//! serialise, and the second one sees the first one's log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::max;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{DiscoveryLogRepository, DiscoveryLogRepositoryError};
use crate::domain::{CacheId, CooldownPolicy, DiscoveryLog, DiscoveryOutcome, NewDiscovery, UserId};

use super::diesel_helpers::{DbFailure, classify_diesel_error, pool_error_message};
use super::models::{LogRow, NewLogRow};
use super::pool::{DbPool, PoolError};
use super::schema::{logs, users};

/// Diesel-backed implementation of the `DiscoveryLogRepository` port.
#[derive(Clone)]
pub struct DieselDiscoveryLogRepository {
    pool: DbPool,
}

impl DieselDiscoveryLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DiscoveryLogRepositoryError {
    DiscoveryLogRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> DiscoveryLogRepositoryError {
    match classify_diesel_error(error, "discovery log repository") {
        DbFailure::Connection(message) => DiscoveryLogRepositoryError::connection(message),
        DbFailure::ForeignKeyViolation(constraint) => {
            DiscoveryLogRepositoryError::missing_reference(constraint)
        }
        DbFailure::UniqueViolation(message) | DbFailure::Query(message) => {
            DiscoveryLogRepositoryError::query(message)
        }
    }
}

#[async_trait]
impl DiscoveryLogRepository for DieselDiscoveryLogRepository {
    async fn record_if_cooled_down(
        &self,
        discovery: &NewDiscovery,
        policy: &CooldownPolicy,
    ) -> Result<DiscoveryOutcome, DiscoveryLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let NewDiscovery {
            logger,
            cache,
            discovered_at,
        } = *discovery;
        let policy = *policy;

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let locked: Option<i64> = users::table
                        .find(logger.get())
                        .select(users::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Ok(None);
                    }

                    let last: Option<DateTime<Utc>> = logs::table
                        .filter(logs::logger.eq(logger.get()))
                        .filter(logs::cache.eq(cache.get()))
                        .select(max(logs::discover_date))
                        .get_result(conn)
                        .await?;
                    let cooldown = policy.evaluate(last, discovered_at);
                    if cooldown.disabled {
                        return Ok(Some(DiscoveryOutcome::CoolingDown(cooldown)));
                    }

                    let row: LogRow = diesel::insert_into(logs::table)
                        .values(&NewLogRow {
                            logger: logger.get(),
                            cache: cache.get(),
                            discover_date: discovered_at,
                        })
                        .returning(LogRow::as_returning())
                        .get_result(conn)
                        .await?;
                    Ok(Some(DiscoveryOutcome::Recorded(row.into())))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        outcome.ok_or_else(|| {
            DiscoveryLogRepositoryError::missing_reference(format!("user {logger}"))
        })
    }

    async fn latest_for(
        &self,
        logger: UserId,
        cache: CacheId,
    ) -> Result<Option<DateTime<Utc>>, DiscoveryLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        logs::table
            .filter(logs::logger.eq(logger.get()))
            .filter(logs::cache.eq(cache.get()))
            .select(max(logs::discover_date))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_for_cache(
        &self,
        cache: CacheId,
        limit: Option<usize>,
    ) -> Result<Vec<DiscoveryLog>, DiscoveryLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let query = logs::table
            .filter(logs::cache.eq(cache.get()))
            .select(LogRow::as_select());
        let rows: Vec<LogRow> = match limit {
            None => query
                .order((logs::discover_date.asc(), logs::id.asc()))
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?,
            Some(limit) => {
                let mut newest: Vec<LogRow> = query
                    .order((logs::discover_date.desc(), logs::id.desc()))
                    .limit(i64::try_from(limit).unwrap_or(i64::MAX))
                    .load(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                newest.reverse();
                newest
            }
        };
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_for_logger(
        &self,
        logger: UserId,
    ) -> Result<Vec<DiscoveryLog>, DiscoveryLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<LogRow> = logs::table
            .filter(logs::logger.eq(logger.get()))
            .select(LogRow::as_select())
            .order((logs::discover_date.desc(), logs::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
