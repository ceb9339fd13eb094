//! Bookmark state for a (profile, cache) pair.

/// Whether a profile has saved a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkState {
    /// The pair exists.
    Bookmarked,
    /// The pair does not exist.
    NotBookmarked,
}

impl BookmarkState {
    /// Wire flag for the state.
    #[must_use]
    pub const fn is_bookmarked(self) -> bool {
        matches!(self, Self::Bookmarked)
    }

    /// State after one toggle.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Bookmarked => Self::NotBookmarked,
            Self::NotBookmarked => Self::Bookmarked,
        }
    }
}

impl From<bool> for BookmarkState {
    fn from(value: bool) -> Self {
        if value {
            Self::Bookmarked
        } else {
            Self::NotBookmarked
        }
    }
}
