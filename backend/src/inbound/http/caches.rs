//! Catalogue endpoints.
//!
//! ```text
//! GET  /loadGeoCaches
//! GET  /search?q=arbor
//! GET  /generateCacheURL?_signature=…&cache_id=3
//! GET  /getCache/{id}
//! GET  /load_hidden_caches
//! POST /addCache?_signature=…      {"cache_name":"Porter","lat":36.99,…}
//! POST /approveCache?_signature=…  {"id":3}
//! POST /deleteCache?_signature=…   {"id":3}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde_json::json;

use crate::domain::{ApiResult, CacheDraft, CacheId, Error};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::{
    CacheBody, CacheResponse, CachesResponse, GenerateUrlQuery, IdRequest, LinkedCacheBody,
    LinkedCachesResponse, NewCacheRequest, SearchQuery, UrlResponse,
};
use crate::inbound::http::pages::cache_info_path;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::url_signer::{SignedSession, UrlSigner};

/// Caches shown on the map: everything for admins, approved caches otherwise.
#[utoipa::path(
    get,
    path = "/loadGeoCaches",
    responses(
        (status = 200, description = "Caches", body = CachesResponse),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["caches"],
    operation_id = "loadGeoCaches",
    security([])
)]
#[get("/loadGeoCaches")]
pub async fn load_geo_caches(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<CachesResponse>> {
    let viewer = state.viewer(&session).await?;
    let caches = state.caches.list_for(viewer).await?;
    Ok(web::Json(CachesResponse {
        caches: caches.into_iter().map(CacheBody::from).collect(),
    }))
}

/// Approved caches whose name contains `q`, ignoring case.
#[utoipa::path(
    get,
    path = "/search",
    params(SearchQuery),
    responses((status = 200, description = "Matching caches", body = CachesResponse)),
    tags = ["caches"],
    operation_id = "searchCaches",
    security([])
)]
#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<CachesResponse>> {
    let needle = query.into_inner().q.unwrap_or_default();
    let caches = state.caches.search(&needle).await?;
    Ok(web::Json(CachesResponse {
        caches: caches.into_iter().map(CacheBody::from).collect(),
    }))
}

/// Mint a signed detail-page URL for `cache_id`.
#[utoipa::path(
    get,
    path = "/generateCacheURL",
    params(GenerateUrlQuery),
    responses(
        (status = 200, description = "Signed URL", body = UrlResponse),
        (status = 403, description = "Missing or invalid signature", body = Error)
    ),
    tags = ["caches"],
    operation_id = "generateCacheUrl"
)]
#[get("/generateCacheURL")]
pub async fn generate_cache_url(
    signed: SignedSession,
    signer: web::Data<UrlSigner>,
    query: web::Query<GenerateUrlQuery>,
) -> ApiResult<web::Json<UrlResponse>> {
    let id = CacheId::new(query.cache_id);
    let url = signer.signed_url(signed.session(), &cache_info_path(id))?;
    Ok(web::Json(UrlResponse { url }))
}

/// One cache with its author's name.
#[utoipa::path(
    get,
    path = "/getCache/{id}",
    params(("id" = i64, Path, description = "Cache id")),
    responses(
        (status = 200, description = "Cache", body = CacheResponse),
        (status = 404, description = "Missing, or pending and caller not admin", body = Error)
    ),
    tags = ["caches"],
    operation_id = "getCache",
    security([])
)]
#[get("/getCache/{id}")]
pub async fn get_cache(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<CacheResponse>> {
    let viewer = state.viewer(&session).await?;
    let cache = state
        .caches
        .detail(viewer, CacheId::new(path.into_inner()))
        .await?;
    Ok(web::Json(CacheResponse {
        cache: cache.into(),
    }))
}

/// The caller's approved caches.
#[utoipa::path(
    get,
    path = "/load_hidden_caches",
    responses(
        (status = 200, description = "Caller's caches", body = LinkedCachesResponse),
        (status = 401, description = "Not logged in or not registered", body = Error)
    ),
    tags = ["caches"],
    operation_id = "loadHiddenCaches"
)]
#[get("/load_hidden_caches")]
pub async fn load_hidden_caches(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_account()?;
    let user = state.viewer(&session).await?.require_user()?;
    let caches = state.caches.hidden_by(user).await?;
    let body = LinkedCachesResponse {
        caches: caches
            .into_iter()
            .map(|cache| LinkedCacheBody {
                href: cache_info_path(cache.id),
                cache: cache.into(),
            })
            .collect(),
    };
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Suggest a cache; it stays pending until an admin approves it.
#[utoipa::path(
    post,
    path = "/addCache",
    request_body = NewCacheRequest,
    responses(
        (status = 201, description = "Pending cache created", body = CacheBody),
        (status = 400, description = "Invalid cache", body = Error),
        (status = 401, description = "Not logged in or not registered", body = Error),
        (status = 403, description = "Missing or invalid signature", body = Error)
    ),
    tags = ["caches"],
    operation_id = "addCache"
)]
#[post("/addCache")]
pub async fn add_cache(
    signed: SignedSession,
    state: web::Data<HttpState>,
    payload: web::Json<NewCacheRequest>,
) -> ApiResult<HttpResponse> {
    signed.session().require_account()?;
    let user = state.viewer(signed.session()).await?.require_user()?;
    let draft = CacheDraft::try_from(payload.into_inner())?;
    let cache = state.cache_commands.suggest(user, draft).await?;
    Ok(HttpResponse::Created().json(CacheBody::from(cache)))
}

/// Approve a pending cache. Admins only; idempotent.
#[utoipa::path(
    post,
    path = "/approveCache",
    request_body = IdRequest,
    responses(
        (status = 200, description = "Approved"),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Invalid signature or not an admin", body = Error),
        (status = 404, description = "No such cache", body = Error)
    ),
    tags = ["caches"],
    operation_id = "approveCache"
)]
#[post("/approveCache")]
pub async fn approve_cache(
    signed: SignedSession,
    state: web::Data<HttpState>,
    payload: web::Json<IdRequest>,
) -> ApiResult<HttpResponse> {
    signed.session().require_account()?;
    let viewer = state.viewer(signed.session()).await?;
    state
        .cache_commands
        .approve(viewer, CacheId::new(payload.id))
        .await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// Delete a cache with its logs and bookmarks. Admins only.
#[utoipa::path(
    post,
    path = "/deleteCache",
    request_body = IdRequest,
    responses(
        (status = 200, description = "Deleted"),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Invalid signature or not an admin", body = Error),
        (status = 404, description = "No such cache", body = Error)
    ),
    tags = ["caches"],
    operation_id = "deleteCache"
)]
#[post("/deleteCache")]
pub async fn delete_cache(
    signed: SignedSession,
    state: web::Data<HttpState>,
    payload: web::Json<IdRequest>,
) -> ApiResult<HttpResponse> {
    signed.session().require_account()?;
    let viewer = state.viewer(signed.session()).await?;
    state
        .cache_commands
        .delete(viewer, CacheId::new(payload.id))
        .await?;
    Ok(HttpResponse::Ok().json(json!({})))
}
