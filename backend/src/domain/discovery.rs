//! Discovery logs and the cooldown between successive logs.
//!
//! A profile may log the same cache repeatedly, but never twice within the
//! cooldown interval. The policy is a pure function of the most recent log
//! time and "now"; stores evaluate it inside the same critical section as the
//! insert so concurrent attempts cannot both pass.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{CacheId, UserId};

/// Default minimum interval between two logs of one cache by one profile.
pub const DEFAULT_COOLDOWN_MINUTES: i64 = 15;

/// Integer identifier of a discovery log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(i64);

impl LogId {
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

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stored discovery event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryLog {
    /// Identifier.
    pub id: LogId,
    /// Profile that found the cache.
    pub logger: UserId,
    /// Cache that was found.
    pub cache: CacheId,
    /// When the discovery was recorded.
    pub discovered_at: DateTime<Utc>,
}

/// Discovery about to be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewDiscovery {
    /// Profile that found the cache.
    pub logger: UserId,
    /// Cache that was found.
    pub cache: CacheId,
    /// Attempt time, also used as "now" for the cooldown check.
    pub discovered_at: DateTime<Utc>,
}

/// Result of evaluating the cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownState {
    /// True while a new log would be refused.
    pub disabled: bool,
    /// When logging becomes possible again; "now" when there is no prior log.
    pub refresh_time: DateTime<Utc>,
}

/// Cooldown rule applied before every log insertion.
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use geocache::domain::CooldownPolicy;
///
/// let policy = CooldownPolicy::default();
/// let last = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
///
/// assert!(policy.evaluate(Some(last), last + TimeDelta::minutes(10)).disabled);
/// assert!(!policy.evaluate(Some(last), last + TimeDelta::minutes(16)).disabled);
/// assert!(!policy.evaluate(None, last).disabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    interval: TimeDelta,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self::new(TimeDelta::minutes(DEFAULT_COOLDOWN_MINUTES))
    }
}

impl CooldownPolicy {
    /// Build a policy with a custom interval.
    #[must_use]
    pub const fn new(interval: TimeDelta) -> Self {
        Self { interval }
    }

    /// Configured interval.
    #[must_use]
    pub const fn interval(&self) -> TimeDelta {
        self.interval
    }

    /// Decide whether a log may be recorded at `now` given the most recent
    /// prior log time.
    ///
    /// Logging is allowed only once `now` is strictly after the refresh time.
    #[must_use]
    pub fn evaluate(&self, last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> CooldownState {
        match last {
            None => CooldownState {
                disabled: false,
                refresh_time: now,
            },
            Some(last) => {
                let refresh_time = last + self.interval;
                CooldownState {
                    disabled: now <= refresh_time,
                    refresh_time,
                }
            }
        }
    }
}

/// Outcome of an attempt to record a discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    /// The cooldown allowed the log and it was stored.
    Recorded(DiscoveryLog),
    /// The cooldown refused the log; nothing was stored.
    CoolingDown(CooldownState),
}

/// Discovery joined with the logger's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedDiscovery {
    /// The log entry.
    pub log: DiscoveryLog,
    /// Logger's first name.
    pub first_name: String,
    /// Logger's last name.
    pub last_name: String,
}

/// Discovery joined with the cache name, for a profile's activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    /// The log entry.
    pub log: DiscoveryLog,
    /// Name of the discovered cache.
    pub cache_name: String,
}
