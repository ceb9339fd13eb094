//! Driving port for profile registration and admin management.

use async_trait::async_trait;

use crate::domain::{AccountId, Error, ProfileDraft, UserId, UserProfile};

/// Domain use-case port for changing profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Create the profile of `account`. Fails with `conflict` when one exists.
    async fn register(&self, account: &AccountId, draft: ProfileDraft)
    -> Result<UserProfile, Error>;

    /// Grant or revoke admin membership. Returns whether membership changed.
    async fn set_admin(&self, user: UserId, admin: bool) -> Result<bool, Error>;
}
