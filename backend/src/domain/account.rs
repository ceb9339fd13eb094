//! Authentication identities and login credentials.
//!
//! An [`AccountId`] is the identity handed out by the login collaborator. It is
//! distinct from the application profile ([`crate::domain::UserId`]) which is
//! only created once the account registers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation failures for account identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountIdError {
    /// The value was blank.
    #[error("account id must not be empty")]
    Empty,
    /// The value was not a UUID.
    #[error("account id must be a valid UUID")]
    InvalidUuid,
}

/// Identity issued by the login collaborator.
///
/// # Examples
/// ```
/// use geocache::domain::AccountId;
///
/// let id = AccountId::new("123e4567-e89b-12d3-a456-426614174000").expect("uuid");
/// assert_eq!(id.to_string(), "123e4567-e89b-12d3-a456-426614174000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(Uuid);

impl AccountId {
    /// Parse an account id from its textual form.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, AccountIdError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountIdError::Empty);
        }
        Uuid::parse_str(trimmed)
            .map(Self)
            .map_err(|_| AccountIdError::InvalidUuid)
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random account id.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// The username is trimmed; the password is kept verbatim and wiped from
/// memory on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Build credentials from raw request values.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password exactly as supplied.
    pub fn password(&self) -> &str {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", AccountIdError::Empty)]
    #[case("   ", AccountIdError::Empty)]
    #[case("cache-hunter", AccountIdError::InvalidUuid)]
    fn rejects_malformed_account_ids(#[case] raw: &str, #[case] expected: AccountIdError) {
        assert_eq!(AccountId::new(raw), Err(expected));
    }

    #[rstest]
    fn account_id_serialises_as_string() {
        let id = AccountId::new("123e4567-e89b-12d3-a456-426614174000").expect("uuid");
        let json = serde_json::to_string(&id).expect("serialise");
        assert_eq!(json, "\"123e4567-e89b-12d3-a456-426614174000\"");
        let back: AccountId = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, id);
    }

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("  ", "pw", LoginValidationError::EmptyUsername)]
    #[case("ranger", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials_are_rejected(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn username_is_trimmed_and_password_kept() {
        let creds = LoginCredentials::try_from_parts("  ranger ", " secret ").expect("valid");
        assert_eq!(creds.username(), "ranger");
        assert_eq!(creds.password(), " secret ");
    }
}
