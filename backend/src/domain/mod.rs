//! Domain primitives, policies and services.
//!
//! Purpose: Define strongly typed entities used by the HTTP and persistence
//! layers, the cooldown policy governing discovery logs, and the services
//! implementing the driving ports in [`ports`].
//!
//! Public surface:
//! - Error, ErrorCode: transport-agnostic failure payload.
//! - AccountId, LoginCredentials: login identity.
//! - UserId, ProfileDraft, UserProfile, Viewer: application profiles and the
//!   access level derived from them.
//! - CacheId, CacheDraft, Cache, CacheFilter: geocaches and their lifecycle.
//! - CooldownPolicy, DiscoveryLog: discovery logging.
//! - BookmarkState: saved caches.

pub mod account;
pub mod bookmark;
pub mod bookmark_service;
pub mod cache;
pub mod catalogue_service;
pub mod demo_seed;
pub mod discovery;
pub mod discovery_service;
pub mod error;
pub mod ports;
pub mod profile;
pub mod profile_service;
mod service_errors;
pub mod trace_id;

pub use self::account::{AccountId, AccountIdError, LoginCredentials, LoginValidationError};
pub use self::bookmark::BookmarkState;
pub use self::bookmark_service::BookmarkService;
pub use self::cache::{
    Cache, CacheDraft, CacheFilter, CacheId, CacheStatus, CacheValidationError, CacheWithAuthor,
    Coordinates, NewCache, Rating, RatingKind, RawCacheDraft,
};
pub use self::catalogue_service::CatalogueService;
pub use self::demo_seed::{DemoSeeder, SeedReport};
pub use self::discovery::{
    Activity, CooldownPolicy, CooldownState, DEFAULT_COOLDOWN_MINUTES, DiscoveryLog,
    DiscoveryOutcome, LogId, NamedDiscovery, NewDiscovery,
};
pub use self::discovery_service::DiscoveryService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::profile::{
    ProfileDetails, ProfileDraft, ProfileValidationError, UserId, UserProfile, Viewer,
};
pub use self::profile_service::ProfileService;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use geocache::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("admin only"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
