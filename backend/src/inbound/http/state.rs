//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain ports, so
//! they can be exercised against in-memory or mocked implementations.

use std::sync::Arc;

use crate::domain::ports::{
    BookmarkCommand, BookmarkQuery, CacheCommand, CacheQuery, DiscoveryCommand, DiscoveryQuery,
    LoginService, ProfileCommand, ProfileQuery,
};
use crate::domain::{Error, Viewer};
use crate::inbound::http::session::SessionContext;

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Credential checks.
    pub login: Arc<dyn LoginService>,
    /// Profile reads.
    pub profiles: Arc<dyn ProfileQuery>,
    /// Profile writes.
    pub profile_commands: Arc<dyn ProfileCommand>,
    /// Catalogue reads.
    pub caches: Arc<dyn CacheQuery>,
    /// Catalogue writes.
    pub cache_commands: Arc<dyn CacheCommand>,
    /// Discovery log reads.
    pub discoveries: Arc<dyn DiscoveryQuery>,
    /// Discovery logging.
    pub discovery_commands: Arc<dyn DiscoveryCommand>,
    /// Bookmark reads.
    pub bookmarks: Arc<dyn BookmarkQuery>,
    /// Bookmark toggles.
    pub bookmark_commands: Arc<dyn BookmarkCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential checks.
    pub login: Arc<dyn LoginService>,
    /// Profile reads.
    pub profiles: Arc<dyn ProfileQuery>,
    /// Profile writes.
    pub profile_commands: Arc<dyn ProfileCommand>,
    /// Catalogue reads.
    pub caches: Arc<dyn CacheQuery>,
    /// Catalogue writes.
    pub cache_commands: Arc<dyn CacheCommand>,
    /// Discovery log reads.
    pub discoveries: Arc<dyn DiscoveryQuery>,
    /// Discovery logging.
    pub discovery_commands: Arc<dyn DiscoveryCommand>,
    /// Bookmark reads.
    pub bookmarks: Arc<dyn BookmarkQuery>,
    /// Bookmark toggles.
    pub bookmark_commands: Arc<dyn BookmarkCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            profiles,
            profile_commands,
            caches,
            cache_commands,
            discoveries,
            discovery_commands,
            bookmarks,
            bookmark_commands,
        } = ports;
        Self {
            login,
            profiles,
            profile_commands,
            caches,
            cache_commands,
            discoveries,
            discovery_commands,
            bookmarks,
            bookmark_commands,
        }
    }

    /// Access level of the caller.
    ///
    /// Logged-out callers and accounts without a profile are anonymous.
    pub async fn viewer(&self, session: &SessionContext) -> Result<Viewer, Error> {
        match session.account_id()? {
            Some(account) => self.profiles.viewer_for(&account).await,
            None => Ok(Viewer::Anonymous),
        }
    }
}
