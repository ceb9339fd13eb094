//! Profile service: registration, lookups, and admin membership.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{AdminRegistry, ProfileCommand, ProfileQuery, ProfileRepository};
use crate::domain::service_errors::{map_admin_error, map_profile_error};
use crate::domain::{AccountId, Error, ProfileDetails, ProfileDraft, UserId, UserProfile, Viewer};

/// Profile service implementing the profile driving ports.
#[derive(Clone)]
pub struct ProfileService<P, A> {
    profiles: Arc<P>,
    admins: Arc<A>,
}

impl<P, A> ProfileService<P, A> {
    /// Create a new service over the given repositories.
    pub fn new(profiles: Arc<P>, admins: Arc<A>) -> Self {
        Self { profiles, admins }
    }
}

impl<P, A> ProfileService<P, A>
where
    P: ProfileRepository,
    A: AdminRegistry,
{
    async fn is_admin(&self, user: UserId) -> Result<bool, Error> {
        self.admins.is_admin(user).await.map_err(map_admin_error)
    }
}

#[async_trait]
impl<P, A> ProfileQuery for ProfileService<P, A>
where
    P: ProfileRepository,
    A: AdminRegistry,
{
    async fn viewer_for(&self, account: &AccountId) -> Result<Viewer, Error> {
        let Some(profile) = self.profile_for_account(account).await? else {
            return Ok(Viewer::Anonymous);
        };
        let admin = self.is_admin(profile.id).await?;
        Ok(Viewer::from_profile(Some(profile.id), admin))
    }

    async fn profile_for_account(
        &self,
        account: &AccountId,
    ) -> Result<Option<UserProfile>, Error> {
        self.profiles
            .find_by_account(account)
            .await
            .map_err(map_profile_error)
    }

    async fn details(&self, account: &AccountId) -> Result<ProfileDetails, Error> {
        let profile = self
            .profile_for_account(account)
            .await?
            .ok_or_else(|| Error::not_found("profile not registered"))?;
        let admin = self.is_admin(profile.id).await?;
        Ok(ProfileDetails { profile, admin })
    }

    async fn find_user(&self, id: UserId) -> Result<Option<UserProfile>, Error> {
        self.profiles.find_by_id(id).await.map_err(map_profile_error)
    }
}

#[async_trait]
impl<P, A> ProfileCommand for ProfileService<P, A>
where
    P: ProfileRepository,
    A: AdminRegistry,
{
    async fn register(
        &self,
        account: &AccountId,
        draft: ProfileDraft,
    ) -> Result<UserProfile, Error> {
        let profile = self
            .profiles
            .insert(account, &draft)
            .await
            .map_err(map_profile_error)?;
        info!(user_id = %profile.id, %account, "profile registered");
        Ok(profile)
    }

    async fn set_admin(&self, user: UserId, admin: bool) -> Result<bool, Error> {
        let changed = if admin {
            self.admins.grant(user).await
        } else {
            self.admins.revoke(user).await
        }
        .map_err(map_admin_error)?;
        info!(user_id = %user, admin, changed, "admin membership updated");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        AdminRegistryError, MockAdminRegistry, MockProfileRepository, ProfileRepositoryError,
    };
    use crate::test_support::sample_profile;
    use rstest::rstest;

    fn make_service(
        profiles: MockProfileRepository,
        admins: MockAdminRegistry,
    ) -> ProfileService<MockProfileRepository, MockAdminRegistry> {
        ProfileService::new(Arc::new(profiles), Arc::new(admins))
    }

    #[rstest]
    #[case(None, false, Viewer::Anonymous)]
    #[case(Some(3), false, Viewer::Member(UserId::new(3)))]
    #[case(Some(3), true, Viewer::Admin(UserId::new(3)))]
    #[tokio::test]
    async fn viewer_reflects_registration_and_membership(
        #[case] profile: Option<i64>,
        #[case] admin: bool,
        #[case] expected: Viewer,
    ) {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_find_by_account()
            .return_once(move |_| Ok(profile.map(sample_profile)));
        let mut admins = MockAdminRegistry::new();
        admins.expect_is_admin().returning(move |_| Ok(admin));

        let service = make_service(profiles, admins);
        let viewer = service
            .viewer_for(&AccountId::random())
            .await
            .expect("viewer resolved");
        assert_eq!(viewer, expected);
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_conflict() {
        let mut profiles = MockProfileRepository::new();
        profiles
            .expect_insert()
            .return_once(|account, _| Err(ProfileRepositoryError::duplicate(account.to_string())));

        let service = make_service(profiles, MockAdminRegistry::new());
        let draft = ProfileDraft::try_new("Ada", "Lovelace", "ada@example.com").expect("draft");
        let err = service
            .register(&AccountId::random(), draft)
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn details_require_registration() {
        let mut profiles = MockProfileRepository::new();
        profiles.expect_find_by_account().return_once(|_| Ok(None));

        let service = make_service(profiles, MockAdminRegistry::new());
        let err = service
            .details(&AccountId::random())
            .await
            .expect_err("unregistered");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn granting_unknown_user_is_not_found() {
        let mut admins = MockAdminRegistry::new();
        admins
            .expect_grant()
            .return_once(|user| Err(AdminRegistryError::unknown_user(user.get())));

        let service = make_service(MockProfileRepository::new(), admins);
        let err = service
            .set_admin(UserId::new(40), true)
            .await
            .expect_err("unknown user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn revoking_delegates_to_registry() {
        let mut admins = MockAdminRegistry::new();
        admins.expect_revoke().times(1).return_once(|_| Ok(true));

        let service = make_service(MockProfileRepository::new(), admins);
        assert!(service.set_admin(UserId::new(2), false).await.expect("revoked"));
    }
}
