//! Driven port for the admin set.
//!
//! Admin privilege is membership in a set of profiles, never a field on the
//! profile itself.

use async_trait::async_trait;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by admin registry adapters.
    pub enum AdminRegistryError {
        /// Registry connection could not be established.
        Connection { message: String } => "admin registry connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "admin registry query failed: {message}",
        /// The profile to grant does not exist.
        UnknownUser { id: i64 } => "user {id} does not exist",
    }
}

/// Membership operations on the admin set.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRegistry: Send + Sync {
    /// Whether `user` belongs to the set.
    async fn is_admin(&self, user: UserId) -> Result<bool, AdminRegistryError>;

    /// Add `user` to the set. Returns `false` when already a member.
    async fn grant(&self, user: UserId) -> Result<bool, AdminRegistryError>;

    /// Remove `user` from the set. Returns `false` when not a member.
    async fn revoke(&self, user: UserId) -> Result<bool, AdminRegistryError>;
}
