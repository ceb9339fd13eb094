//! Route table for the HTTP adapter.
//!
//! The server and the test suites share [`configure`], so an endpoint is
//! reachable in tests exactly when it is reachable in production. Health
//! probes and Swagger UI are mounted by the server itself.

use actix_web::web;

use crate::inbound::http::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::inbound::http::{auth, bookmarks, caches, discoveries, pages, users};

/// Register every application endpoint and the extractor error handlers.
///
/// Expects `web::Data<HttpState>` and `web::Data<UrlSigner>` to be provided
/// by the enclosing `App`, wrapped in a session middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(auth::index)
        .service(auth::login)
        .service(auth::logout)
        .service(pages::map)
        .service(pages::cache_info)
        .service(pages::profile)
        .service(pages::bookmarks)
        .service(pages::suggest)
        .service(pages::pending)
        .service(caches::load_geo_caches)
        .service(caches::search)
        .service(caches::generate_cache_url)
        .service(caches::get_cache)
        .service(caches::load_hidden_caches)
        .service(caches::add_cache)
        .service(caches::approve_cache)
        .service(caches::delete_cache)
        .service(discoveries::log_cache)
        .service(discoveries::check_timer)
        .service(discoveries::get_logs)
        .service(discoveries::load_activity)
        .service(bookmarks::set_bookmarked)
        .service(bookmarks::get_bookmarked)
        .service(bookmarks::get_bookmarks)
        .service(users::add_user)
        .service(users::get_user)
        .service(users::load_profile_details);
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
