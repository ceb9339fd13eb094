//! Bookmark endpoints.
//!
//! ```text
//! PUT /setBookmarked/{id}?_signature=…
//! GET /getBookmarked/{id}?_signature=…
//! GET /get_bookmarks?_signature=…
//! ```

use actix_web::{HttpResponse, get, put, web};

use crate::domain::{ApiResult, CacheId, Error};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::{BookmarkedResponse, BookmarksResponse, LinkedCacheBody};
use crate::inbound::http::pages::cache_info_path;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::url_signer::{SignedSession, UrlSigner};

/// Toggle the caller's bookmark on a cache.
#[utoipa::path(
    put,
    path = "/setBookmarked/{id}",
    params(("id" = i64, Path, description = "Cache id")),
    responses(
        (status = 200, description = "State after the toggle", body = BookmarkedResponse),
        (status = 401, description = "Not logged in or not registered", body = Error),
        (status = 403, description = "Missing or invalid signature", body = Error),
        (status = 404, description = "Cache missing or pending", body = Error)
    ),
    tags = ["bookmarks"],
    operation_id = "setBookmarked"
)]
#[put("/setBookmarked/{id}")]
pub async fn set_bookmarked(
    signed: SignedSession,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<BookmarkedResponse>> {
    signed.session().require_account()?;
    let viewer = state.viewer(signed.session()).await?;
    let bookmark = state
        .bookmark_commands
        .toggle(viewer, CacheId::new(path.into_inner()))
        .await?;
    Ok(web::Json(BookmarkedResponse {
        bookmarked: bookmark.is_bookmarked(),
    }))
}

/// Whether the caller has bookmarked a cache.
#[utoipa::path(
    get,
    path = "/getBookmarked/{id}",
    params(("id" = i64, Path, description = "Cache id")),
    responses(
        (status = 200, description = "Bookmark state", body = BookmarkedResponse),
        (status = 401, description = "Not logged in or not registered", body = Error),
        (status = 403, description = "Missing or invalid signature", body = Error)
    ),
    tags = ["bookmarks"],
    operation_id = "getBookmarked"
)]
#[get("/getBookmarked/{id}")]
pub async fn get_bookmarked(
    signed: SignedSession,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    signed.session().require_account()?;
    let viewer = state.viewer(signed.session()).await?;
    let bookmark = state
        .bookmarks
        .state(viewer, CacheId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(BookmarkedResponse {
            bookmarked: bookmark.is_bookmarked(),
        }))
}

/// The caller's bookmarked caches with signed detail links.
#[utoipa::path(
    get,
    path = "/get_bookmarks",
    responses(
        (status = 200, description = "Bookmarked caches", body = BookmarksResponse),
        (status = 401, description = "Not logged in or not registered", body = Error),
        (status = 403, description = "Missing or invalid signature", body = Error)
    ),
    tags = ["bookmarks"],
    operation_id = "getBookmarks"
)]
#[get("/get_bookmarks")]
pub async fn get_bookmarks(
    signed: SignedSession,
    state: web::Data<HttpState>,
    signer: web::Data<UrlSigner>,
) -> ApiResult<HttpResponse> {
    let session = signed.session();
    session.require_account()?;
    let viewer = state.viewer(session).await?;
    let caches = state.bookmarks.bookmarked_caches(viewer).await?;
    let bookmarks = caches
        .into_iter()
        .map(|cache| {
            let href = signer.signed_url(session, &cache_info_path(cache.id))?;
            Ok(LinkedCacheBody {
                href,
                cache: cache.into(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(BookmarksResponse { bookmarks }))
}
