//! Landing page, login and logout.
//!
//! ```text
//! GET  /
//! POST /login {"username":"admin","password":"password"}
//! POST /logout
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{ApiResult, Error, LoginCredentials, Viewer};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::LoginRequest;
use crate::inbound::http::pages::see_other;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::url_signer::UrlSigner;

/// Landing page bootstrap for callers without a profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LandingPage {
    /// Login endpoint.
    pub login_url: String,
    /// Signed profile registration endpoint.
    pub add_user_url: String,
    /// Whether the caller is logged in (but not yet registered).
    pub logged_in: bool,
}

/// Result of a successful login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Whether the account already has a profile.
    pub registered: bool,
    /// Where the client should go next.
    pub next: String,
}

/// Landing page; registered callers are sent to `/map`.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Landing bootstrap", body = LandingPage),
        (status = 303, description = "Registered caller; redirect to /map")
    ),
    tags = ["pages"],
    operation_id = "index",
    security([])
)]
#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    signer: web::Data<UrlSigner>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let viewer = state.viewer(&session).await?;
    if viewer != Viewer::Anonymous {
        return Ok(see_other("/map"));
    }
    let body = LandingPage {
        login_url: "/login".to_owned(),
        add_user_url: signer.signed_url(&session, "/add_user")?,
        logged_in: session.account_id()?.is_some(),
    };
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Authenticate and start a session.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Blank username or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let account = state.login.authenticate(&credentials).await?;
    session.persist_account(&account)?;
    let registered = state.profiles.profile_for_account(&account).await?.is_some();
    info!(%account, registered, "login succeeded");
    Ok(web::Json(LoginResponse {
        registered,
        next: if registered { "/map" } else { "/" }.to_owned(),
    }))
}

/// End the session; signed URLs issued to it stop verifying.
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 303, description = "Logged out; redirect to /")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    see_other("/")
}
