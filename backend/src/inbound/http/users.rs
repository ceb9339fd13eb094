//! Profile endpoints.
//!
//! ```text
//! POST /add_user?_signature=…  {"first_name":"Ada","last_name":"Lovelace","email":"ada@example.com"}
//! POST /getUser                {"id":1}
//! GET  /load_profile_details
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{ApiResult, Error, ProfileDraft, UserId};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::{IdRequest, NewUserRequest, ProfileResponse, UserResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::url_signer::SignedSession;

/// Register a profile for the logged-in account.
#[utoipa::path(
    post,
    path = "/add_user",
    request_body = NewUserRequest,
    responses(
        (status = 201, description = "Profile created", body = UserResponse),
        (status = 400, description = "Invalid profile", body = Error),
        (status = 401, description = "Not logged in", body = Error),
        (status = 403, description = "Missing or invalid signature", body = Error),
        (status = 409, description = "Account already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "addUser"
)]
#[post("/add_user")]
pub async fn add_user(
    signed: SignedSession,
    state: web::Data<HttpState>,
    payload: web::Json<NewUserRequest>,
) -> ApiResult<HttpResponse> {
    let account = signed.session().require_account()?;
    let draft = ProfileDraft::try_from(payload.into_inner())?;
    let profile = state.profile_commands.register(&account, draft).await?;
    Ok(HttpResponse::Created().json(UserResponse {
        user: Some(profile.into()),
    }))
}

/// Look up a profile by id; `{"user": null}` when it does not exist.
#[utoipa::path(
    post,
    path = "/getUser",
    request_body = IdRequest,
    responses((status = 200, description = "Profile or null", body = UserResponse)),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[post("/getUser")]
pub async fn get_user(
    state: web::Data<HttpState>,
    payload: web::Json<IdRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.profiles.find_user(UserId::new(payload.id)).await?;
    Ok(web::Json(UserResponse {
        user: user.map(Into::into),
    }))
}

/// The caller's profile with its admin flag.
#[utoipa::path(
    get,
    path = "/load_profile_details",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Not logged in", body = Error),
        (status = 404, description = "Account not registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "loadProfileDetails"
)]
#[get("/load_profile_details")]
pub async fn load_profile_details(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    let details = state.profiles.details(&account).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(ProfileResponse {
            profile: details.into(),
        }))
}
