//! Page bootstrap endpoints.
//!
//! Each page fetches a small JSON document naming the data endpoints it
//! should call, with signed URLs already minted for the caller's session.
//! Logged-out callers are redirected to `/`.
//!
//! ```text
//! GET /map
//! GET /cache_info/{id}
//! GET /profile
//! GET /bookmarks
//! GET /suggest
//! GET /pending
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, CacheId, ErrorCode, Viewer};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::CacheBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::url_signer::UrlSigner;

/// `303 See Other` to `location`.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Detail page path for a cache.
pub(crate) fn cache_info_path(id: CacheId) -> String {
    format!("/cache_info/{id}")
}

fn page<T: Serialize>(body: &T) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body)
}

/// Map page bootstrap.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MapPage {
    /// Cache listing.
    pub load_geo_caches_url: String,
    /// Name search.
    pub search_url: String,
    /// Signed detail-link generator.
    pub generate_cache_url: String,
}

/// Cache detail page bootstrap.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CacheInfoPage {
    /// Cache shown on the page.
    pub cache_id: i64,
    /// Cache with author name.
    pub get_cache_url: String,
    /// Profile lookup.
    pub get_user_url: String,
    /// Signed bookmark toggle.
    pub set_bookmarked_url: String,
    /// Signed bookmark state.
    pub get_bookmarked_url: String,
    /// Signed discovery logging.
    pub log_cache_url: String,
    /// Discovery logs.
    pub get_logs_url: String,
    /// Signed cooldown check.
    pub check_timer_url: String,
}

/// Profile page bootstrap.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfilePage {
    /// Profile with admin flag.
    pub load_profile_url: String,
    /// Caller's discovery feed.
    pub load_activity_url: String,
    /// Caller's approved caches.
    pub load_hidden_caches_url: String,
    /// Review queue.
    pub go_to_pending_url: String,
}

/// Bookmarks page bootstrap.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookmarksPage {
    /// Signed bookmark listing.
    pub get_bookmarks_url: String,
}

/// Suggest page bootstrap.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestPage {
    /// Signed suggestion endpoint.
    pub add_cache_url: String,
    /// Cache listing, for placing the new cache on the map.
    pub load_geo_caches_url: String,
}

/// Review queue bootstrap.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PendingPage {
    /// Caches awaiting review, oldest first.
    pub caches: Vec<CacheBody>,
    /// Signed approval endpoint.
    pub approve_cache_url: String,
    /// Signed deletion endpoint.
    pub delete_cache_url: String,
    /// Profile lookup for authors.
    pub get_user_url: String,
}

/// Map page.
#[utoipa::path(
    get,
    path = "/map",
    responses(
        (status = 200, description = "Map bootstrap", body = MapPage),
        (status = 303, description = "Not logged in; redirect to /")
    ),
    tags = ["pages"],
    operation_id = "mapPage"
)]
#[get("/map")]
pub async fn map(session: SessionContext, signer: web::Data<UrlSigner>) -> ApiResult<HttpResponse> {
    if session.account_id()?.is_none() {
        return Ok(see_other("/"));
    }
    Ok(page(&MapPage {
        load_geo_caches_url: "/loadGeoCaches".to_owned(),
        search_url: "/search".to_owned(),
        generate_cache_url: signer.signed_url(&session, "/generateCacheURL")?,
    }))
}

/// Cache detail page; redirects to `/map` when the cache is not visible.
#[utoipa::path(
    get,
    path = "/cache_info/{id}",
    params(("id" = i64, Path, description = "Cache id")),
    responses(
        (status = 200, description = "Detail bootstrap", body = CacheInfoPage),
        (status = 303, description = "Not logged in, or cache missing or pending")
    ),
    tags = ["pages"],
    operation_id = "cacheInfoPage"
)]
#[get("/cache_info/{id}")]
pub async fn cache_info(
    state: web::Data<HttpState>,
    signer: web::Data<UrlSigner>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    if session.account_id()?.is_none() {
        return Ok(see_other("/"));
    }
    let id = CacheId::new(path.into_inner());
    let viewer = state.viewer(&session).await?;
    match state.caches.detail(viewer, id).await {
        Ok(_) => {}
        Err(err) if err.code() == ErrorCode::NotFound => return Ok(see_other("/map")),
        Err(err) => return Err(err),
    }
    Ok(page(&CacheInfoPage {
        cache_id: id.get(),
        get_cache_url: format!("/getCache/{id}"),
        get_user_url: "/getUser".to_owned(),
        set_bookmarked_url: signer.signed_url(&session, &format!("/setBookmarked/{id}"))?,
        get_bookmarked_url: signer.signed_url(&session, &format!("/getBookmarked/{id}"))?,
        log_cache_url: signer.signed_url(&session, &format!("/logCache/{id}"))?,
        get_logs_url: format!("/getLogs/{id}"),
        check_timer_url: signer.signed_url(&session, &format!("/checkTimer/{id}"))?,
    }))
}

/// Profile page.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile bootstrap", body = ProfilePage),
        (status = 303, description = "Not logged in; redirect to /")
    ),
    tags = ["pages"],
    operation_id = "profilePage"
)]
#[get("/profile")]
pub async fn profile(session: SessionContext) -> ApiResult<HttpResponse> {
    if session.account_id()?.is_none() {
        return Ok(see_other("/"));
    }
    Ok(page(&ProfilePage {
        load_profile_url: "/load_profile_details".to_owned(),
        load_activity_url: "/load_activity".to_owned(),
        load_hidden_caches_url: "/load_hidden_caches".to_owned(),
        go_to_pending_url: "/pending".to_owned(),
    }))
}

/// Bookmarks page.
#[utoipa::path(
    get,
    path = "/bookmarks",
    responses(
        (status = 200, description = "Bookmarks bootstrap", body = BookmarksPage),
        (status = 303, description = "Not logged in; redirect to /")
    ),
    tags = ["pages"],
    operation_id = "bookmarksPage"
)]
#[get("/bookmarks")]
pub async fn bookmarks(
    session: SessionContext,
    signer: web::Data<UrlSigner>,
) -> ApiResult<HttpResponse> {
    if session.account_id()?.is_none() {
        return Ok(see_other("/"));
    }
    Ok(page(&BookmarksPage {
        get_bookmarks_url: signer.signed_url(&session, "/get_bookmarks")?,
    }))
}

/// Suggest page.
#[utoipa::path(
    get,
    path = "/suggest",
    responses(
        (status = 200, description = "Suggest bootstrap", body = SuggestPage),
        (status = 303, description = "Not logged in; redirect to /")
    ),
    tags = ["pages"],
    operation_id = "suggestPage"
)]
#[get("/suggest")]
pub async fn suggest(
    session: SessionContext,
    signer: web::Data<UrlSigner>,
) -> ApiResult<HttpResponse> {
    if session.account_id()?.is_none() {
        return Ok(see_other("/"));
    }
    Ok(page(&SuggestPage {
        add_cache_url: signer.signed_url(&session, "/addCache")?,
        load_geo_caches_url: "/loadGeoCaches".to_owned(),
    }))
}

/// Review queue; non-admins are redirected to `/map`.
#[utoipa::path(
    get,
    path = "/pending",
    responses(
        (status = 200, description = "Pending caches", body = PendingPage),
        (status = 303, description = "Not logged in, or not an admin")
    ),
    tags = ["pages"],
    operation_id = "pendingPage"
)]
#[get("/pending")]
pub async fn pending(
    state: web::Data<HttpState>,
    signer: web::Data<UrlSigner>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    if session.account_id()?.is_none() {
        return Ok(see_other("/"));
    }
    let viewer = state.viewer(&session).await?;
    if !matches!(viewer, Viewer::Admin(_)) {
        return Ok(see_other("/map"));
    }
    let caches = state.caches.pending(viewer).await?;
    Ok(page(&PendingPage {
        caches: caches.into_iter().map(CacheBody::from).collect(),
        approve_cache_url: signer.signed_url(&session, "/approveCache")?,
        delete_cache_url: signer.signed_url(&session, "/deleteCache")?,
        get_user_url: "/getUser".to_owned(),
    }))
}
