//! Discovery log endpoints.
//!
//! ```text
//! PUT /logCache/{id}?_signature=…
//! GET /checkTimer/{id}?_signature=…
//! GET /getLogs/{id}?limit=10
//! GET /load_activity
//! ```

use actix_web::{HttpResponse, get, put, web};

use crate::domain::{ApiResult, CacheId, Error};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::{
    ActivitiesResponse, ActivityBody, LogBody, LogResponse, LogsQuery, LogsResponse,
    TimerResponse,
};
use crate::inbound::http::pages::cache_info_path;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::url_signer::SignedSession;

/// Log a discovery unless the caller's cooldown for this cache is running.
#[utoipa::path(
    put,
    path = "/logCache/{id}",
    params(("id" = i64, Path, description = "Cache id")),
    responses(
        (status = 200, description = "Recorded log, or null while cooling down", body = LogResponse),
        (status = 401, description = "Not logged in or not registered", body = Error),
        (status = 403, description = "Missing or invalid signature", body = Error),
        (status = 404, description = "Cache missing or pending", body = Error)
    ),
    tags = ["discoveries"],
    operation_id = "logCache"
)]
#[put("/logCache/{id}")]
pub async fn log_cache(
    signed: SignedSession,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<LogResponse>> {
    signed.session().require_account()?;
    let viewer = state.viewer(signed.session()).await?;
    let log = state
        .discovery_commands
        .log_discovery(viewer, CacheId::new(path.into_inner()))
        .await?;
    Ok(web::Json(LogResponse {
        log: log.map(LogBody::from),
    }))
}

/// Cooldown state for the caller without logging.
#[utoipa::path(
    get,
    path = "/checkTimer/{id}",
    params(("id" = i64, Path, description = "Cache id")),
    responses(
        (status = 200, description = "Cooldown state", body = TimerResponse),
        (status = 401, description = "Not logged in or not registered", body = Error),
        (status = 403, description = "Missing or invalid signature", body = Error),
        (status = 404, description = "Cache missing or pending", body = Error)
    ),
    tags = ["discoveries"],
    operation_id = "checkTimer"
)]
#[get("/checkTimer/{id}")]
pub async fn check_timer(
    signed: SignedSession,
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    signed.session().require_account()?;
    let viewer = state.viewer(signed.session()).await?;
    let timer = state
        .discoveries
        .check_timer(viewer, CacheId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(TimerResponse::from(timer)))
}

/// Logs of a cache with logger names, oldest first.
#[utoipa::path(
    get,
    path = "/getLogs/{id}",
    params(("id" = i64, Path, description = "Cache id"), LogsQuery),
    responses(
        (status = 200, description = "Logs", body = LogsResponse),
        (status = 401, description = "Not logged in", body = Error),
        (status = 404, description = "Cache missing or pending", body = Error)
    ),
    tags = ["discoveries"],
    operation_id = "getLogs"
)]
#[get("/getLogs/{id}")]
pub async fn get_logs(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    query: web::Query<LogsQuery>,
) -> ApiResult<web::Json<LogsResponse>> {
    session.require_account()?;
    let viewer = state.viewer(&session).await?;
    let logs = state
        .discoveries
        .logs_for_cache(viewer, CacheId::new(path.into_inner()), query.limit)
        .await?;
    Ok(web::Json(LogsResponse {
        logs: logs.into_iter().map(LogBody::from).collect(),
    }))
}

/// The caller's discoveries, newest first.
#[utoipa::path(
    get,
    path = "/load_activity",
    responses(
        (status = 200, description = "Activity feed", body = ActivitiesResponse),
        (status = 401, description = "Not logged in or not registered", body = Error)
    ),
    tags = ["discoveries"],
    operation_id = "loadActivity"
)]
#[get("/load_activity")]
pub async fn load_activity(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    session.require_account()?;
    let user = state.viewer(&session).await?.require_user()?;
    let activity = state.discoveries.activity(user).await?;
    let body = ActivitiesResponse {
        activities: activity
            .into_iter()
            .map(|entry| {
                let href = cache_info_path(entry.log.cache);
                ActivityBody::new(entry, href)
            })
            .collect(),
    };
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}
