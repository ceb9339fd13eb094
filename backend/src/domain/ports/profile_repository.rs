//! Driven port for application profiles.

use async_trait::async_trait;

use crate::domain::{AccountId, ProfileDraft, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
        /// The account already owns a profile.
        Duplicate { account: String } => "account {account} already has a profile",
    }
}

/// Storage for profiles, keyed both by integer id and by owning account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Create the profile for `account`.
    ///
    /// Fails with [`ProfileRepositoryError::Duplicate`] when the account is
    /// already registered.
    async fn insert(
        &self,
        account: &AccountId,
        draft: &ProfileDraft,
    ) -> Result<UserProfile, ProfileRepositoryError>;

    /// Fetch a profile by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserProfile>, ProfileRepositoryError>;

    /// Fetch the profile owned by `account`.
    async fn find_by_account(
        &self,
        account: &AccountId,
    ) -> Result<Option<UserProfile>, ProfileRepositoryError>;

    /// Fetch the profiles among `ids` that exist.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<UserProfile>, ProfileRepositoryError>;
}
