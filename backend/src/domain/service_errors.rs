//! Mapping from driven port failures onto domain errors.
//!
//! Connection failures are reported as `service_unavailable` so clients may
//! retry; query failures are internal. Port-specific variants map to the
//! closest client-facing code.

use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::{
    AdminRegistryError, BookmarkRepositoryError, CacheRepositoryError,
    DiscoveryLogRepositoryError, ProfileRepositoryError,
};

pub(crate) fn map_cache_error(error: CacheRepositoryError) -> Error {
    match error {
        CacheRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("cache repository unavailable: {message}"))
        }
        CacheRepositoryError::Query { message } => {
            Error::internal(format!("cache repository error: {message}"))
        }
        CacheRepositoryError::MissingReference { message } => {
            Error::not_found(format!("cache author not found: {message}"))
        }
    }
}

pub(crate) fn map_profile_error(error: ProfileRepositoryError) -> Error {
    match error {
        ProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        ProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
        ProfileRepositoryError::Duplicate { account } => {
            warn!(%account, "duplicate profile registration");
            Error::conflict("profile already registered for this account")
        }
    }
}

pub(crate) fn map_admin_error(error: AdminRegistryError) -> Error {
    match error {
        AdminRegistryError::Connection { message } => {
            Error::service_unavailable(format!("admin registry unavailable: {message}"))
        }
        AdminRegistryError::Query { message } => {
            Error::internal(format!("admin registry error: {message}"))
        }
        AdminRegistryError::UnknownUser { id } => Error::not_found(format!("user {id} not found")),
    }
}

pub(crate) fn map_log_error(error: DiscoveryLogRepositoryError) -> Error {
    match error {
        DiscoveryLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("log repository unavailable: {message}"))
        }
        DiscoveryLogRepositoryError::Query { message } => {
            Error::internal(format!("log repository error: {message}"))
        }
        DiscoveryLogRepositoryError::MissingReference { message } => {
            Error::not_found(format!("log target not found: {message}"))
        }
    }
}

pub(crate) fn map_bookmark_error(error: BookmarkRepositoryError) -> Error {
    match error {
        BookmarkRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("bookmark repository unavailable: {message}"))
        }
        BookmarkRepositoryError::Query { message } => {
            Error::internal(format!("bookmark repository error: {message}"))
        }
        BookmarkRepositoryError::MissingReference { message } => {
            Error::not_found(format!("bookmarked cache not found: {message}"))
        }
    }
}
