//! Application profiles and the access level derived from them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{AccountId, Error};

const NAME_MAX: usize = 64;
const EMAIL_MAX: usize = 254;

/// Integer identifier of an application profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw database identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation failures for profile registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    /// First name missing after trimming.
    #[error("first name must not be empty")]
    EmptyFirstName,
    /// Last name missing after trimming.
    #[error("last name must not be empty")]
    EmptyLastName,
    /// A field exceeded its storage limit.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum accepted length.
        max: usize,
    },
    /// Email is not shaped like `local@domain`.
    #[error("email must be a valid address")]
    InvalidEmail,
}

/// Validated registration data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    first_name: String,
    last_name: String,
    email: String,
}

impl ProfileDraft {
    /// Validate raw registration values.
    ///
    /// # Examples
    /// ```
    /// use geocache::domain::ProfileDraft;
    ///
    /// let draft = ProfileDraft::try_new(" Ada ", "Lovelace", "ada@example.com").expect("valid");
    /// assert_eq!(draft.first_name(), "Ada");
    /// ```
    pub fn try_new(
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<Self, ProfileValidationError> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        let email = email.trim();

        if first_name.is_empty() {
            return Err(ProfileValidationError::EmptyFirstName);
        }
        if last_name.is_empty() {
            return Err(ProfileValidationError::EmptyLastName);
        }
        check_length("first_name", first_name, NAME_MAX)?;
        check_length("last_name", last_name, NAME_MAX)?;
        check_length("email", email, EMAIL_MAX)?;
        if !looks_like_email(email) {
            return Err(ProfileValidationError::InvalidEmail);
        }

        Ok(Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email: email.to_owned(),
        })
    }

    /// Trimmed first name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Trimmed last name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Trimmed email address.
    pub fn email(&self) -> &str {
        &self.email
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ProfileValidationError> {
    if value.chars().count() > max {
        return Err(ProfileValidationError::TooLong { field, max });
    }
    Ok(())
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Registered application profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Profile identifier.
    pub id: UserId,
    /// Login identity owning the profile.
    pub account_id: AccountId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
}

/// Profile enriched with its admin membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDetails {
    /// The profile itself.
    pub profile: UserProfile,
    /// Whether the profile belongs to the admin set.
    pub admin: bool,
}

/// Access level of the caller, resolved from session and admin membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// No session, or a session without a registered profile.
    Anonymous,
    /// Registered profile without admin membership.
    Member(UserId),
    /// Registered profile in the admin set.
    Admin(UserId),
}

impl Viewer {
    /// Build a viewer from an optional profile id and admin flag.
    #[must_use]
    pub fn from_profile(user: Option<UserId>, admin: bool) -> Self {
        match (user, admin) {
            (None, _) => Self::Anonymous,
            (Some(id), true) => Self::Admin(id),
            (Some(id), false) => Self::Member(id),
        }
    }

    /// Profile id of the caller, when registered.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Member(id) | Self::Admin(id) => Some(*id),
        }
    }

    /// Whether the caller belongs to the admin set.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin(_))
    }

    /// Profile id of the caller, or `unauthorized` when anonymous.
    pub fn require_user(&self) -> Result<UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::unauthorized("a registered profile is required"))
    }

    /// Profile id of an admin caller.
    ///
    /// Anonymous callers get `unauthorized`; members get `forbidden`.
    pub fn require_admin(&self) -> Result<UserId, Error> {
        match self {
            Self::Admin(id) => Ok(*id),
            Self::Member(_) => Err(Error::forbidden("admin privileges required")),
            Self::Anonymous => Err(Error::unauthorized("a registered profile is required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("", "Lovelace", "ada@example.com", ProfileValidationError::EmptyFirstName)]
    #[case("Ada", "  ", "ada@example.com", ProfileValidationError::EmptyLastName)]
    #[case("Ada", "Lovelace", "ada.example.com", ProfileValidationError::InvalidEmail)]
    #[case("Ada", "Lovelace", "@example.com", ProfileValidationError::InvalidEmail)]
    #[case("Ada", "Lovelace", "ada@", ProfileValidationError::InvalidEmail)]
    #[case("Ada", "Lovelace", "a da@example.com", ProfileValidationError::InvalidEmail)]
    fn rejects_invalid_registrations(
        #[case] first: &str,
        #[case] last: &str,
        #[case] email: &str,
        #[case] expected: ProfileValidationError,
    ) {
        assert_eq!(ProfileDraft::try_new(first, last, email), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_names() {
        let long = "x".repeat(NAME_MAX + 1);
        assert_eq!(
            ProfileDraft::try_new(&long, "Lovelace", "ada@example.com"),
            Err(ProfileValidationError::TooLong {
                field: "first_name",
                max: NAME_MAX
            })
        );
    }

    #[rstest]
    #[case(None, false, Viewer::Anonymous)]
    #[case(None, true, Viewer::Anonymous)]
    #[case(Some(UserId::new(7)), false, Viewer::Member(UserId::new(7)))]
    #[case(Some(UserId::new(7)), true, Viewer::Admin(UserId::new(7)))]
    fn viewer_reflects_profile_and_membership(
        #[case] user: Option<UserId>,
        #[case] admin: bool,
        #[case] expected: Viewer,
    ) {
        let viewer = Viewer::from_profile(user, admin);
        assert_eq!(viewer, expected);
        assert_eq!(viewer.user_id(), user);
    }

    #[rstest]
    #[case(Viewer::Anonymous, Some(ErrorCode::Unauthorized))]
    #[case(Viewer::Member(UserId::new(2)), Some(ErrorCode::Forbidden))]
    #[case(Viewer::Admin(UserId::new(1)), None)]
    fn admin_requirement(#[case] viewer: Viewer, #[case] failure: Option<ErrorCode>) {
        assert_eq!(viewer.require_admin().err().map(|err| err.code()), failure);
    }
}
