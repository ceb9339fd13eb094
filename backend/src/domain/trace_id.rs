//! Request-scoped trace identifier.
//!
//! The identifier lives in Tokio task-local storage so errors and log lines
//! can pick it up without threading it through every call. Task locals are
//! not inherited by spawned tasks; wrap such work in [`TraceId::scope`].

use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static TRACE_ID: TraceId;
}

/// Correlation identifier for a single request.
///
/// # Examples
/// ```
/// use geocache::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id: TraceId = "00000000-0000-0000-0000-000000000001".parse().expect("uuid");
/// let seen = TraceId::scope(id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a caller-supplied header value, ignoring anything that is not a
    /// UUID.
    #[must_use]
    pub fn from_header(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }

    /// Identifier bound to the current task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` bound as the current identifier.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn scope_exposes_identifier() {
        let id = TraceId::generate();
        assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
    }

    #[tokio::test]
    async fn nothing_is_current_outside_a_scope() {
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true)]
    #[case("  3fa85f64-5717-4562-b3fc-2c963f66afa6 ", true)]
    #[case("not-a-trace", false)]
    #[case("", false)]
    fn header_values_must_be_uuids(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(TraceId::from_header(raw).is_some(), accepted);
    }

    #[rstest]
    fn display_matches_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(TraceId::from_uuid(uuid).to_string(), uuid.to_string());
    }
}
