//! Request and response bodies.
//!
//! Field names follow the stored column names (`cache_name`, `discover_date`,
//! `user_email`, ...) so existing front-end code can consume the payloads
//! unchanged. Domain types stay free of serde and OpenAPI derives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Activity, Cache, CacheDraft, CacheWithAuthor, CooldownState, Error, LoginCredentials,
    NamedDiscovery, ProfileDetails, ProfileDraft, RawCacheDraft, UserProfile,
};
use crate::inbound::http::validation::{
    cache_validation_error, login_validation_error, profile_validation_error,
};

/// A cache as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheBody {
    /// Cache id.
    #[schema(example = 3)]
    pub id: i64,
    /// Display name.
    #[schema(example = "Arboretum")]
    pub cache_name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub long: f64,
    /// Description.
    pub description: String,
    /// Hint for seekers.
    pub hint: String,
    /// Author profile id.
    pub author: i64,
    /// Creation time.
    pub creation_date: DateTime<Utc>,
    /// Difficulty, 1 to 5.
    pub difficulty: u8,
    /// Terrain, 1 to 5.
    pub terrain: u8,
    /// Size, 1 to 5.
    pub size: u8,
    /// Whether an admin approved the cache.
    pub valid: bool,
}

impl From<Cache> for CacheBody {
    fn from(cache: Cache) -> Self {
        Self {
            id: cache.id.get(),
            cache_name: cache.name,
            lat: cache.coordinates.lat(),
            long: cache.coordinates.long(),
            description: cache.description,
            hint: cache.hint,
            author: cache.author.get(),
            creation_date: cache.created_at,
            difficulty: cache.difficulty.get(),
            terrain: cache.terrain.get(),
            size: cache.size.get(),
            valid: cache.status.is_approved(),
        }
    }
}

/// A cache with its author's name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheWithAuthorBody {
    /// Cache fields.
    #[serde(flatten)]
    pub cache: CacheBody,
    /// Author's first name.
    pub first_name: String,
    /// Author's last name.
    pub last_name: String,
}

impl From<CacheWithAuthor> for CacheWithAuthorBody {
    fn from(value: CacheWithAuthor) -> Self {
        Self {
            cache: value.cache.into(),
            first_name: value.first_name,
            last_name: value.last_name,
        }
    }
}

/// A cache with a link to its detail page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LinkedCacheBody {
    /// Cache fields.
    #[serde(flatten)]
    pub cache: CacheBody,
    /// Detail page link.
    pub href: String,
}

/// `{"caches": [...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CachesResponse {
    /// Listed caches.
    pub caches: Vec<CacheBody>,
}

/// `{"caches": [...]}` with links.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LinkedCachesResponse {
    /// Listed caches.
    pub caches: Vec<LinkedCacheBody>,
}

/// `{"cache": {...}}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheResponse {
    /// The cache with its author's name.
    pub cache: CacheWithAuthorBody,
}

/// `{"bookmarks": [...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookmarksResponse {
    /// Bookmarked caches, most recent first.
    pub bookmarks: Vec<LinkedCacheBody>,
}

/// `{"bookmarked": bool}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookmarkedResponse {
    /// Whether the caller has bookmarked the cache.
    pub bookmarked: bool,
}

/// A discovery log with the logger's name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogBody {
    /// Log id.
    pub id: i64,
    /// Logger profile id.
    pub logger: i64,
    /// Cache id.
    pub cache: i64,
    /// Discovery time.
    pub discover_date: DateTime<Utc>,
    /// Logger's first name.
    pub first_name: String,
    /// Logger's last name.
    pub last_name: String,
}

impl From<NamedDiscovery> for LogBody {
    fn from(value: NamedDiscovery) -> Self {
        Self {
            id: value.log.id.get(),
            logger: value.log.logger.get(),
            cache: value.log.cache.get(),
            discover_date: value.log.discovered_at,
            first_name: value.first_name,
            last_name: value.last_name,
        }
    }
}

/// `{"log": {...} | null}`; `null` while the cooldown is running.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogResponse {
    /// The recorded log, if any.
    pub log: Option<LogBody>,
}

/// `{"logs": [...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogsResponse {
    /// Logs, oldest first.
    pub logs: Vec<LogBody>,
}

/// Cooldown state for the caller and a cache.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TimerResponse {
    /// True while logging is refused.
    pub disabled: bool,
    /// When logging becomes possible again.
    pub refresh_time: DateTime<Utc>,
}

impl From<CooldownState> for TimerResponse {
    fn from(state: CooldownState) -> Self {
        Self {
            disabled: state.disabled,
            refresh_time: state.refresh_time,
        }
    }
}

/// One entry of the caller's activity feed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivityBody {
    /// Log id.
    pub id: i64,
    /// Logger profile id.
    pub logger: i64,
    /// Cache id.
    pub cache: i64,
    /// Discovery time.
    pub discover_date: DateTime<Utc>,
    /// Name of the cache.
    pub cache_name: String,
    /// Detail page link.
    pub href: String,
}

impl ActivityBody {
    /// Build from an activity and its detail link.
    pub fn new(activity: Activity, href: String) -> Self {
        Self {
            id: activity.log.id.get(),
            logger: activity.log.logger.get(),
            cache: activity.log.cache.get(),
            discover_date: activity.log.discovered_at,
            cache_name: activity.cache_name,
            href,
        }
    }
}

/// `{"activities": [...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ActivitiesResponse {
    /// Caller's logs, newest first.
    pub activities: Vec<ActivityBody>,
}

/// Public profile fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserBody {
    /// Profile id.
    pub id: i64,
    /// Owning account.
    pub user_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub user_email: String,
}

impl From<UserProfile> for UserBody {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.get(),
            user_id: profile.account_id.to_string(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            user_email: profile.email,
        }
    }
}

/// `{"user": {...} | null}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// The profile, when it exists.
    pub user: Option<UserBody>,
}

/// Profile plus admin flag.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileBody {
    /// Profile fields.
    #[serde(flatten)]
    pub user: UserBody,
    /// Whether the profile is in the admin set.
    pub admin: bool,
}

impl From<ProfileDetails> for ProfileBody {
    fn from(details: ProfileDetails) -> Self {
        Self {
            user: details.profile.into(),
            admin: details.admin,
        }
    }
}

/// `{"profile": {...}}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    /// Caller's profile.
    pub profile: ProfileBody,
}

/// `{"url": "..."}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UrlResponse {
    /// Signed URL.
    pub url: String,
}

/// Login request body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Username.
    #[schema(example = "admin")]
    pub username: String,
    /// Password.
    #[schema(example = "password")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
            .map_err(|err| login_validation_error(&err))
    }
}

/// Suggested cache.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewCacheRequest {
    /// Display name.
    #[schema(example = "Porter")]
    pub cache_name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub long: f64,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Hint.
    #[serde(default)]
    pub hint: String,
    /// Difficulty, 1 to 5.
    pub difficulty: i64,
    /// Terrain, 1 to 5.
    pub terrain: i64,
    /// Size, 1 to 5.
    pub size: i64,
}

impl TryFrom<NewCacheRequest> for CacheDraft {
    type Error = Error;

    fn try_from(value: NewCacheRequest) -> Result<Self, Self::Error> {
        Self::try_from(RawCacheDraft {
            name: value.cache_name,
            lat: value.lat,
            long: value.long,
            description: value.description,
            hint: value.hint,
            difficulty: value.difficulty,
            terrain: value.terrain,
            size: value.size,
        })
        .map_err(|err| cache_validation_error(&err))
    }
}

/// Profile registration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewUserRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
}

impl TryFrom<NewUserRequest> for ProfileDraft {
    type Error = Error;

    fn try_from(value: NewUserRequest) -> Result<Self, Self::Error> {
        Self::try_new(&value.first_name, &value.last_name, &value.email)
            .map_err(|err| profile_validation_error(&err))
    }
}

/// `{"id": n}` body naming a cache or profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct IdRequest {
    /// Target id.
    pub id: i64,
}

/// Query for `/generateCacheURL`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct GenerateUrlQuery {
    /// Cache to link to.
    pub cache_id: i64,
}

/// Query for `/getLogs/{id}`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LogsQuery {
    /// Keep only the most recent `limit` logs.
    pub limit: Option<usize>,
}

/// Query for `/search`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive name filter.
    pub q: Option<String>,
}
