//! Geocaches: points of interest suggested by users and reviewed by admins.
//!
//! A cache starts [`CacheStatus::Pending`] and only becomes visible to the
//! public catalogue once an admin approves it. Deletion is terminal and is a
//! repository concern.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{UserId, Viewer};

const CACHE_NAME_MAX: usize = 128;

/// Integer identifier of a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheId(i64);

impl CacheId {
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

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Review state of a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheStatus {
    /// Suggested and awaiting admin review.
    Pending,
    /// Approved and publicly listed.
    Approved,
}

impl CacheStatus {
    /// Map the stored validity flag onto a status.
    #[must_use]
    pub const fn from_valid(valid: bool) -> Self {
        if valid { Self::Approved } else { Self::Pending }
    }

    /// Stored validity flag for this status.
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Which rating a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingKind {
    /// How hard the cache is to find.
    Difficulty,
    /// How hard the ground is to cover.
    Terrain,
    /// Container size.
    Size,
}

impl RatingKind {
    /// Wire field name for the rating.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Difficulty => "difficulty",
            Self::Terrain => "terrain",
            Self::Size => "size",
        }
    }
}

/// A 1 to 5 rating used for difficulty, terrain and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating.
    pub const MAX: u8 = 5;

    /// Validate a raw rating.
    pub fn try_new(kind: RatingKind, raw: i64) -> Result<Self, CacheValidationError> {
        u8::try_from(raw)
            .ok()
            .filter(|value| (Self::MIN..=Self::MAX).contains(value))
            .map(Self)
            .ok_or(CacheValidationError::RatingOutOfRange { kind, value: raw })
    }

    /// Rating value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// WGS84 position of a cache.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    long: f64,
}

impl Coordinates {
    /// Validate latitude and longitude ranges.
    pub fn try_new(lat: f64, long: f64) -> Result<Self, CacheValidationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CacheValidationError::LatitudeOutOfRange(lat));
        }
        if !long.is_finite() || !(-180.0..=180.0).contains(&long) {
            return Err(CacheValidationError::LongitudeOutOfRange(long));
        }
        Ok(Self { lat, long })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn long(&self) -> f64 {
        self.long
    }
}

/// Reasons a cache suggestion is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CacheValidationError {
    /// Name blank after trimming.
    #[error("cache name must not be empty")]
    EmptyName,
    /// Name longer than the stored column.
    #[error("cache name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Latitude outside [-90, 90].
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude outside [-180, 180].
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    /// A rating outside 1 to 5.
    #[error("{} must be between 1 and 5, got {value}", .kind.field())]
    RatingOutOfRange {
        /// Rating that failed.
        kind: RatingKind,
        /// Raw value supplied.
        value: i64,
    },
}

/// Unvalidated suggestion values as received from a client.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCacheDraft {
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub long: f64,
    /// Free-form description.
    pub description: String,
    /// Hint shown to seekers.
    pub hint: String,
    /// Difficulty rating.
    pub difficulty: i64,
    /// Terrain rating.
    pub terrain: i64,
    /// Size rating.
    pub size: i64,
}

/// Validated cache suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheDraft {
    name: String,
    coordinates: Coordinates,
    description: String,
    hint: String,
    difficulty: Rating,
    terrain: Rating,
    size: Rating,
}

impl TryFrom<RawCacheDraft> for CacheDraft {
    type Error = CacheValidationError;

    fn try_from(raw: RawCacheDraft) -> Result<Self, Self::Error> {
        let name = raw.name.trim();
        if name.is_empty() {
            return Err(CacheValidationError::EmptyName);
        }
        if name.chars().count() > CACHE_NAME_MAX {
            return Err(CacheValidationError::NameTooLong {
                max: CACHE_NAME_MAX,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            coordinates: Coordinates::try_new(raw.lat, raw.long)?,
            description: raw.description.trim().to_owned(),
            hint: raw.hint.trim().to_owned(),
            difficulty: Rating::try_new(RatingKind::Difficulty, raw.difficulty)?,
            terrain: Rating::try_new(RatingKind::Terrain, raw.terrain)?,
            size: Rating::try_new(RatingKind::Size, raw.size)?,
        })
    }
}

impl CacheDraft {
    /// Trimmed display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validated position.
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Description text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Hint text.
    pub fn hint(&self) -> &str {
        &self.hint
    }

    /// Difficulty rating.
    pub fn difficulty(&self) -> Rating {
        self.difficulty
    }

    /// Terrain rating.
    pub fn terrain(&self) -> Rating {
        self.terrain
    }

    /// Size rating.
    pub fn size(&self) -> Rating {
        self.size
    }
}

/// Cache ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCache {
    /// Validated suggestion.
    pub draft: CacheDraft,
    /// Suggesting profile.
    pub author: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Initial review state.
    pub status: CacheStatus,
}

/// Stored cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Cache {
    /// Identifier.
    pub id: CacheId,
    /// Display name.
    pub name: String,
    /// Position.
    pub coordinates: Coordinates,
    /// Description text.
    pub description: String,
    /// Hint text.
    pub hint: String,
    /// Suggesting profile.
    pub author: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Difficulty rating.
    pub difficulty: Rating,
    /// Terrain rating.
    pub terrain: Rating,
    /// Size rating.
    pub size: Rating,
    /// Review state.
    pub status: CacheStatus,
}

impl Cache {
    /// Materialise a stored cache from a new one and its assigned id.
    #[must_use]
    pub fn from_new(id: CacheId, new: NewCache) -> Self {
        let NewCache {
            draft,
            author,
            created_at,
            status,
        } = new;
        Self {
            id,
            name: draft.name,
            coordinates: draft.coordinates,
            description: draft.description,
            hint: draft.hint,
            author,
            created_at,
            difficulty: draft.difficulty,
            terrain: draft.terrain,
            size: draft.size,
            status,
        }
    }

    /// Whether the public catalogue may show this cache to `viewer`.
    ///
    /// Pending caches are only ever shown to admins.
    #[must_use]
    pub fn is_visible_to(&self, viewer: &Viewer) -> bool {
        self.status.is_approved() || viewer.is_admin()
    }
}

/// Cache joined with its author's name.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheWithAuthor {
    /// The cache.
    pub cache: Cache,
    /// Author's first name.
    pub first_name: String,
    /// Author's last name.
    pub last_name: String,
}

/// Criteria for listing caches. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheFilter {
    /// Restrict to a review state.
    pub status: Option<CacheStatus>,
    /// Restrict to one author.
    pub author: Option<UserId>,
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
}

impl CacheFilter {
    /// Filter matching every cache.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a review state.
    #[must_use]
    pub fn with_status(mut self, status: CacheStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to one author.
    #[must_use]
    pub fn by_author(mut self, author: UserId) -> Self {
        self.author = Some(author);
        self
    }

    /// Restrict to names containing `needle`, ignoring blank needles.
    #[must_use]
    pub fn named(mut self, needle: &str) -> Self {
        let needle = needle.trim();
        self.name_contains = (!needle.is_empty()).then(|| needle.to_owned());
        self
    }

    /// Evaluate the filter against a cache in memory.
    #[must_use]
    pub fn matches(&self, cache: &Cache) -> bool {
        let status_ok = self.status.is_none_or(|status| cache.status == status);
        let author_ok = self.author.is_none_or(|author| cache.author == author);
        let name_ok = self.name_contains.as_deref().is_none_or(|needle| {
            cache
                .name
                .to_lowercase()
                .contains(needle.to_lowercase().as_str())
        });
        status_ok && author_ok && name_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn raw() -> RawCacheDraft {
        RawCacheDraft {
            name: "  Arboretum ".to_owned(),
            lat: 36.98,
            long: -122.06,
            description: "Trees".to_owned(),
            hint: "Under the gum tree".to_owned(),
            difficulty: 4,
            terrain: 3,
            size: 2,
        }
    }

    fn stored(status: CacheStatus) -> Cache {
        let draft = CacheDraft::try_from(raw()).expect("valid draft");
        Cache::from_new(
            CacheId::new(1),
            NewCache {
                draft,
                author: UserId::new(9),
                created_at: Utc.with_ymd_and_hms(2026, 5, 1, 12, 0, 0).single().expect("ts"),
                status,
            },
        )
    }

    #[rstest]
    fn valid_draft_is_trimmed(raw: RawCacheDraft) {
        let draft = CacheDraft::try_from(raw).expect("valid draft");
        assert_eq!(draft.name(), "Arboretum");
        assert_eq!(draft.difficulty().get(), 4);
        assert_eq!(draft.terrain().get(), 3);
        assert_eq!(draft.size().get(), 2);
    }

    #[rstest]
    #[case::blank_name(|d: &mut RawCacheDraft| d.name = "  ".into(), CacheValidationError::EmptyName)]
    #[case::lat(|d: &mut RawCacheDraft| d.lat = 91.0, CacheValidationError::LatitudeOutOfRange(91.0))]
    #[case::long(|d: &mut RawCacheDraft| d.long = -180.5, CacheValidationError::LongitudeOutOfRange(-180.5))]
    #[case::difficulty(
        |d: &mut RawCacheDraft| d.difficulty = 0,
        CacheValidationError::RatingOutOfRange { kind: RatingKind::Difficulty, value: 0 }
    )]
    #[case::terrain(
        |d: &mut RawCacheDraft| d.terrain = 6,
        CacheValidationError::RatingOutOfRange { kind: RatingKind::Terrain, value: 6 }
    )]
    #[case::size(
        |d: &mut RawCacheDraft| d.size = -1,
        CacheValidationError::RatingOutOfRange { kind: RatingKind::Size, value: -1 }
    )]
    fn invalid_drafts_are_rejected(
        mut raw: RawCacheDraft,
        #[case] mutate: fn(&mut RawCacheDraft),
        #[case] expected: CacheValidationError,
    ) {
        mutate(&mut raw);
        assert_eq!(CacheDraft::try_from(raw), Err(expected));
    }

    #[rstest]
    fn nan_coordinates_are_rejected() {
        assert!(Coordinates::try_new(f64::NAN, 0.0).is_err());
    }

    #[rstest]
    #[case(CacheStatus::Approved, Viewer::Anonymous, true)]
    #[case(CacheStatus::Pending, Viewer::Anonymous, false)]
    #[case(CacheStatus::Pending, Viewer::Member(UserId::new(9)), false)]
    #[case(CacheStatus::Pending, Viewer::Admin(UserId::new(1)), true)]
    fn pending_caches_are_admin_only(
        #[case] status: CacheStatus,
        #[case] viewer: Viewer,
        #[case] visible: bool,
    ) {
        assert_eq!(stored(status).is_visible_to(&viewer), visible);
    }

    #[rstest]
    fn filter_combines_criteria() {
        let cache = stored(CacheStatus::Approved);
        assert!(CacheFilter::all().matches(&cache));
        assert!(CacheFilter::all().named("ARBOR").matches(&cache));
        assert!(!CacheFilter::all().named("quarry").matches(&cache));
        assert!(
            !CacheFilter::all()
                .with_status(CacheStatus::Pending)
                .matches(&cache)
        );
        assert!(
            CacheFilter::all()
                .by_author(UserId::new(9))
                .with_status(CacheStatus::Approved)
                .matches(&cache)
        );
    }

    #[rstest]
    fn blank_name_filter_is_ignored() {
        assert_eq!(CacheFilter::all().named("   ").name_contains, None);
    }
}
