//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`AdminRegistry`]) are implemented by the
//! outbound adapters; driving ports (`*Query`, `*Command`, [`LoginService`])
//! are implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_registry;
mod bookmark_command;
mod bookmark_query;
mod bookmark_repository;
mod cache_command;
mod cache_query;
mod cache_repository;
mod discovery_command;
mod discovery_log_repository;
mod discovery_query;
mod login_service;
mod profile_command;
mod profile_query;
mod profile_repository;

#[cfg(test)]
pub use admin_registry::MockAdminRegistry;
pub use admin_registry::{AdminRegistry, AdminRegistryError};
#[cfg(test)]
pub use bookmark_command::MockBookmarkCommand;
pub use bookmark_command::BookmarkCommand;
#[cfg(test)]
pub use bookmark_query::MockBookmarkQuery;
pub use bookmark_query::BookmarkQuery;
#[cfg(test)]
pub use bookmark_repository::MockBookmarkRepository;
pub use bookmark_repository::{BookmarkRepository, BookmarkRepositoryError};
#[cfg(test)]
pub use cache_command::MockCacheCommand;
pub use cache_command::CacheCommand;
#[cfg(test)]
pub use cache_query::MockCacheQuery;
pub use cache_query::CacheQuery;
#[cfg(test)]
pub use cache_repository::MockCacheRepository;
pub use cache_repository::{CacheRepository, CacheRepositoryError};
#[cfg(test)]
pub use discovery_command::MockDiscoveryCommand;
pub use discovery_command::DiscoveryCommand;
#[cfg(test)]
pub use discovery_log_repository::MockDiscoveryLogRepository;
pub use discovery_log_repository::{DiscoveryLogRepository, DiscoveryLogRepositoryError};
#[cfg(test)]
pub use discovery_query::MockDiscoveryQuery;
pub use discovery_query::DiscoveryQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    DEMO_ADMIN_ACCOUNT, DEMO_RANGER_ACCOUNT, FixtureLoginService, LoginService,
};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::ProfileCommand;
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::ProfileQuery;
#[cfg(test)]
pub use profile_repository::MockProfileRepository;
pub use profile_repository::{ProfileRepository, ProfileRepositoryError};
