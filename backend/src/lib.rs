//! Geocache backend: a geocaching catalogue with discovery logs, bookmarks
//! and an admin review queue, served over Actix Web.
//!
//! - [`domain`]: entities, policies, ports and services.
//! - [`inbound`]: the HTTP adapter.
//! - [`outbound`]: Diesel repositories and the in-memory store.
//! - [`middleware`]: request tracing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
