//! Driving port for authentication.
//!
//! Inbound adapters call this port to exchange credentials for an
//! [`AccountId`] without knowing which identity provider sits behind it.

use async_trait::async_trait;
use uuid::{Uuid, uuid};

use crate::domain::{AccountId, Error, LoginCredentials};

/// Account issued to the `admin` demo login.
pub const DEMO_ADMIN_ACCOUNT: Uuid = uuid!("123e4567-e89b-12d3-a456-426614174000");
/// Account issued to the `ranger` demo login.
pub const DEMO_RANGER_ACCOUNT: Uuid = uuid!("6f1c2a9e-3b7d-4e58-9a0c-51d2e8f4b7a3");

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated account.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AccountId, Error>;
}

/// In-process authenticator with two demo accounts.
///
/// `admin` / `password` and `ranger` / `trailhead` succeed with fixed account
/// ids; anything else is rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AccountId, Error> {
        match (credentials.username(), credentials.password()) {
            ("admin", "password") => Ok(AccountId::from_uuid(DEMO_ADMIN_ACCOUNT)),
            ("ranger", "trailhead") => Ok(AccountId::from_uuid(DEMO_RANGER_ACCOUNT)),
            _ => Err(Error::unauthorized("invalid credentials")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("admin", "password", Some(DEMO_ADMIN_ACCOUNT))]
    #[case("ranger", "trailhead", Some(DEMO_RANGER_ACCOUNT))]
    #[case("admin", "trailhead", None)]
    #[case("someone", "password", None)]
    #[tokio::test]
    async fn fixture_accepts_only_demo_accounts(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: Option<Uuid>,
    ) {
        let creds =
            LoginCredentials::try_from_parts(username, password).expect("credentials shape");
        let result = FixtureLoginService.authenticate(&creds).await;
        match (expected, result) {
            (Some(uuid), Ok(id)) => assert_eq!(id.as_uuid(), &uuid),
            (None, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (expected, result) => panic!("expected {expected:?}, got {result:?}"),
        }
    }
}
