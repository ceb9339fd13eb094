//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! leave it. Conversions into domain types live next to the row they read.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AccountId, Cache, CacheId, CacheStatus, CacheValidationError, Coordinates, DiscoveryLog,
    LogId, NewCache, Rating, RatingKind, UserId, UserProfile,
};

use super::schema::{bookmarks, caches, logs, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub account_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub user_email: String,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.user_email,
        }
    }
}

/// Insertable struct for registering a profile.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub account_id: Uuid,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub user_email: &'a str,
}

/// Row struct for reading from the caches table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = caches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CacheRow {
    pub id: i64,
    pub cache_name: String,
    pub lat: f64,
    pub long: f64,
    pub description: String,
    pub hint: String,
    pub author: i64,
    pub creation_date: DateTime<Utc>,
    pub difficulty: i16,
    pub terrain: i16,
    pub size: i16,
    pub valid: bool,
}

impl TryFrom<CacheRow> for Cache {
    type Error = String;

    fn try_from(row: CacheRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let invalid =
            |err: CacheValidationError| format!("cache {id} holds invalid data: {err}");
        Ok(Self {
            id: CacheId::new(id),
            coordinates: Coordinates::try_new(row.lat, row.long).map_err(invalid)?,
            difficulty: Rating::try_new(RatingKind::Difficulty, row.difficulty.into())
                .map_err(invalid)?,
            terrain: Rating::try_new(RatingKind::Terrain, row.terrain.into()).map_err(invalid)?,
            size: Rating::try_new(RatingKind::Size, row.size.into()).map_err(invalid)?,
            name: row.cache_name,
            description: row.description,
            hint: row.hint,
            author: UserId::new(row.author),
            created_at: row.creation_date,
            status: CacheStatus::from_valid(row.valid),
        })
    }
}

/// Insertable struct for storing a suggested or seeded cache.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = caches)]
pub(crate) struct NewCacheRow<'a> {
    pub cache_name: &'a str,
    pub lat: f64,
    pub long: f64,
    pub description: &'a str,
    pub hint: &'a str,
    pub author: i64,
    pub creation_date: DateTime<Utc>,
    pub difficulty: i16,
    pub terrain: i16,
    pub size: i16,
    pub valid: bool,
}

impl<'a> From<&'a NewCache> for NewCacheRow<'a> {
    fn from(new: &'a NewCache) -> Self {
        let draft = &new.draft;
        Self {
            cache_name: draft.name(),
            lat: draft.coordinates().lat(),
            long: draft.coordinates().long(),
            description: draft.description(),
            hint: draft.hint(),
            author: new.author.get(),
            creation_date: new.created_at,
            difficulty: draft.difficulty().get().into(),
            terrain: draft.terrain().get().into(),
            size: draft.size().get().into(),
            valid: new.status.is_approved(),
        }
    }
}

/// Row struct for reading from the logs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LogRow {
    pub id: i64,
    pub logger: i64,
    pub cache: i64,
    pub discover_date: DateTime<Utc>,
}

impl From<LogRow> for DiscoveryLog {
    fn from(row: LogRow) -> Self {
        Self {
            id: LogId::new(row.id),
            logger: UserId::new(row.logger),
            cache: CacheId::new(row.cache),
            discovered_at: row.discover_date,
        }
    }
}

/// Insertable struct for appending a discovery log.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = logs)]
pub(crate) struct NewLogRow {
    pub logger: i64,
    pub cache: i64,
    pub discover_date: DateTime<Utc>,
}

/// Insertable struct for creating a bookmark pair.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookmarks)]
pub(crate) struct NewBookmarkRow {
    pub user_id: i64,
    pub cache_id: i64,
}
