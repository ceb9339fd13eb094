//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] lists every HTTP endpoint of the inbound layer. Request and
//! response bodies are collected from the handler annotations; the session
//! cookie is registered as the default security scheme and public endpoints
//! opt out with `security([])`.
//!
//! The document backs Swagger UI in debug builds and is exported with
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::session_config::SESSION_COOKIE;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE,
                "Session cookie issued by POST /login.",
            ))),
        );
    }
}

/// OpenAPI document for the HTTP API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Geocache API",
        description = "Geocache catalogue, discovery logs and bookmarks behind a cookie session. \
                       Mutating endpoints expect the `_signature` query parameter minted by the \
                       page bootstraps."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::index,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::pages::map,
        crate::inbound::http::pages::cache_info,
        crate::inbound::http::pages::profile,
        crate::inbound::http::pages::bookmarks,
        crate::inbound::http::pages::suggest,
        crate::inbound::http::pages::pending,
        crate::inbound::http::caches::load_geo_caches,
        crate::inbound::http::caches::search,
        crate::inbound::http::caches::generate_cache_url,
        crate::inbound::http::caches::get_cache,
        crate::inbound::http::caches::load_hidden_caches,
        crate::inbound::http::caches::add_cache,
        crate::inbound::http::caches::approve_cache,
        crate::inbound::http::caches::delete_cache,
        crate::inbound::http::discoveries::log_cache,
        crate::inbound::http::discoveries::check_timer,
        crate::inbound::http::discoveries::get_logs,
        crate::inbound::http::discoveries::load_activity,
        crate::inbound::http::bookmarks::set_bookmarked,
        crate::inbound::http::bookmarks::get_bookmarked,
        crate::inbound::http::bookmarks::get_bookmarks,
        crate::inbound::http::users::add_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::load_profile_details,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Error, ErrorCode)),
    tags(
        (name = "pages", description = "Page bootstraps carrying signed URLs"),
        (name = "auth", description = "Login and logout"),
        (name = "caches", description = "Cache catalogue and review"),
        (name = "discoveries", description = "Discovery logs and cooldown"),
        (name = "bookmarks", description = "Saved caches"),
        (name = "users", description = "Profiles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_code_and_message() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error, "code");
        assert_object_schema_has_field(error, "message");
    }

    #[test]
    fn cache_body_uses_stored_field_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let cache = schemas.get("CacheBody").expect("CacheBody schema");

        for field in ["cache_name", "lat", "long", "creation_date", "valid"] {
            assert_object_schema_has_field(cache, field);
        }
    }

    #[rstest]
    #[case("/")]
    #[case("/loadGeoCaches")]
    #[case("/generateCacheURL")]
    #[case("/cache_info/{id}")]
    #[case("/setBookmarked/{id}")]
    #[case("/logCache/{id}")]
    #[case("/checkTimer/{id}")]
    #[case("/pending")]
    #[case("/approveCache")]
    #[case("/add_user")]
    #[case("/getUser")]
    #[case("/health/ready")]
    fn documents_endpoint(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn registers_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
