//! Driving port for profile reads and access resolution.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, ProfileDetails, UserId, UserProfile, Viewer};

/// Domain use-case port for looking up profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Resolve the access level of a logged-in account.
    ///
    /// Accounts without a profile are [`Viewer::Anonymous`].
    async fn viewer_for(&self, account: &AccountId) -> Result<Viewer, Error>;

    /// Profile owned by `account`, if registered.
    async fn profile_for_account(&self, account: &AccountId)
    -> Result<Option<UserProfile>, Error>;

    /// Profile of `account` with its admin flag. Fails with `not_found` when
    /// the account has not registered.
    async fn details(&self, account: &AccountId) -> Result<ProfileDetails, Error>;

    /// Profile by id.
    async fn find_user(&self, id: UserId) -> Result<Option<UserProfile>, Error>;
}
