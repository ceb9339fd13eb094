//! Handler flows over the full route table and an in-memory store.

use super::*;
use crate::domain::ports::AdminRegistry;
use crate::domain::{CacheStatus, UserId};
use crate::inbound::http::auth::LandingPage;
use crate::inbound::http::dto::{
    BookmarkedResponse, BookmarksResponse, CacheBody, CachesResponse, LogResponse, LogsResponse,
    NewUserRequest, TimerResponse, UrlResponse, UserResponse,
};
use crate::inbound::http::pages::{CacheInfoPage, MapPage, PendingPage, SuggestPage};
use crate::inbound::http::session_config::SESSION_COOKIE;
use crate::inbound::http::test_utils::{test_session_middleware, test_url_signer};
use crate::test_support::{MemoryApp, memory_app, seed_cache};
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};
use std::time::Duration;

fn test_app(
    memory: &MemoryApp,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(memory.state.clone()))
        .app_data(web::Data::new(test_url_signer()))
        .wrap(test_session_middleware())
        .configure(configure)
}

/// Cookie jar for one browser.
#[derive(Default)]
struct Browser {
    cookie: Option<Cookie<'static>>,
}

impl Browser {
    async fn send<S>(&mut self, app: &S, request: actix_test::TestRequest) -> ServiceResponse
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let request = match &self.cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let res = actix_test::call_service(app, request.to_request()).await;
        if let Some(cookie) = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
        {
            self.cookie = Some(cookie.into_owned());
        }
        res
    }

    async fn json<S, T>(&mut self, app: &S, request: actix_test::TestRequest) -> T
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
        T: serde::de::DeserializeOwned,
    {
        let res = self.send(app, request).await;
        assert_eq!(res.status(), StatusCode::OK, "unexpected status");
        actix_test::read_body_json(res).await
    }

    async fn login<S>(&mut self, app: &S, username: &str, password: &str)
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let res = self
            .send(
                app,
                actix_test::TestRequest::post()
                    .uri("/login")
                    .set_json(json!({"username": username, "password": password})),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    /// Log in and create a profile; returns the new profile id.
    async fn register<S>(&mut self, app: &S, username: &str, password: &str) -> UserId
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        self.login(app, username, password).await;
        let landing: LandingPage = self.json(app, actix_test::TestRequest::get().uri("/")).await;
        let res = self
            .send(
                app,
                actix_test::TestRequest::post()
                    .uri(&landing.add_user_url)
                    .set_json(NewUserRequest {
                        first_name: username.to_owned(),
                        last_name: "Tester".to_owned(),
                        email: format!("{username}@example.com"),
                    }),
            )
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: UserResponse = actix_test::read_body_json(res).await;
        UserId::new(body.user.expect("created profile").id)
    }
}

fn location(res: &ServiceResponse) -> Option<&str> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

fn tamper(url: &str) -> String {
    let mut tampered = url.to_owned();
    let last = tampered.pop().expect("non-empty url");
    tampered.push(if last == '0' { '1' } else { '0' });
    tampered
}

#[actix_web::test]
async fn landing_redirects_registered_callers_to_map() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut browser = Browser::default();

    let landing: LandingPage = browser
        .json(&app, actix_test::TestRequest::get().uri("/"))
        .await;
    assert!(!landing.logged_in);
    assert!(landing.add_user_url.starts_with("/add_user?_signature="));

    browser.register(&app, "ranger", "trailhead").await;
    let res = browser
        .send(&app, actix_test::TestRequest::get().uri("/"))
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/map"));
}

#[actix_web::test]
async fn missing_session_is_unauthorized_for_data_and_redirected_for_pages() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut browser = Browser::default();

    let res = browser
        .send(&app, actix_test::TestRequest::get().uri("/getLogs/1"))
        .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");

    let res = browser
        .send(&app, actix_test::TestRequest::get().uri("/map"))
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/"));
}

#[actix_web::test]
async fn signed_endpoints_reject_tampered_signatures() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut browser = Browser::default();
    let user = browser.register(&app, "ranger", "trailhead").await;
    let cache = seed_cache(memory.store.as_ref(), user, "Porter", CacheStatus::Approved).await;

    let info: CacheInfoPage = browser
        .json(
            &app,
            actix_test::TestRequest::get().uri(&format!("/cache_info/{cache}")),
        )
        .await;

    let res = browser
        .send(
            &app,
            actix_test::TestRequest::put().uri(&tamper(&info.set_bookmarked_url)),
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let unsigned = format!("/setBookmarked/{cache}");
    let res = browser
        .send(&app, actix_test::TestRequest::put().uri(&unsigned))
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let toggled: BookmarkedResponse = browser
        .json(
            &app,
            actix_test::TestRequest::put().uri(&info.set_bookmarked_url),
        )
        .await;
    assert!(toggled.bookmarked);
    let state: BookmarkedResponse = browser
        .json(
            &app,
            actix_test::TestRequest::get().uri(&info.get_bookmarked_url),
        )
        .await;
    assert!(state.bookmarked);
}

#[actix_web::test]
async fn signature_is_checked_before_the_session() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut browser = Browser::default();

    let res = browser
        .send(&app, actix_test::TestRequest::put().uri("/logCache/1"))
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn signatures_do_not_transfer_between_paths() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut first = Browser::default();
    first.register(&app, "ranger", "trailhead").await;

    let mut second = Browser::default();
    second.login(&app, "ranger", "trailhead").await;
    let res = second
        .send(&app, actix_test::TestRequest::get().uri("/"))
        .await;
    assert_eq!(location(&res), Some("/map"));

    // Reuse this session's map signature on another path.
    let map: MapPage = second
        .json(&app, actix_test::TestRequest::get().uri("/map"))
        .await;
    let (_, signature) = map
        .generate_cache_url
        .split_once('?')
        .expect("signed query");
    let res = second
        .send(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/add_user?{signature}"))
                .set_json(json!({
                    "first_name": "Again",
                    "last_name": "Tester",
                    "email": "again@example.com"
                })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn second_profile_for_an_account_conflicts() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut browser = Browser::default();
    browser.login(&app, "ranger", "trailhead").await;
    let landing: LandingPage = browser
        .json(&app, actix_test::TestRequest::get().uri("/"))
        .await;
    assert!(landing.logged_in);

    let mut statuses = Vec::new();
    for name in ["First", "Second"] {
        let res = browser
            .send(
                &app,
                actix_test::TestRequest::post()
                    .uri(&landing.add_user_url)
                    .set_json(json!({
                        "first_name": name,
                        "last_name": "Tester",
                        "email": "ranger@example.com"
                    })),
            )
            .await;
        statuses.push(res.status());
    }
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[actix_web::test]
async fn pending_redirects_non_admins_to_map() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut browser = Browser::default();

    let res = browser
        .send(&app, actix_test::TestRequest::get().uri("/pending"))
        .await;
    assert_eq!(location(&res), Some("/"));

    browser.register(&app, "ranger", "trailhead").await;
    let res = browser
        .send(&app, actix_test::TestRequest::get().uri("/pending"))
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/map"));
}

#[actix_web::test]
async fn suggested_cache_is_reviewed_by_an_admin() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut member = Browser::default();
    let mut admin = Browser::default();
    member.register(&app, "ranger", "trailhead").await;
    let admin_id = admin.register(&app, "admin", "password").await;
    memory.store.grant(admin_id).await.expect("grant admin");

    let suggest: SuggestPage = member
        .json(&app, actix_test::TestRequest::get().uri("/suggest"))
        .await;
    let res = member
        .send(
            &app,
            actix_test::TestRequest::post()
                .uri(&suggest.add_cache_url)
                .set_json(json!({
                    "cache_name": "Hidden Grove",
                    "lat": 36.99,
                    "long": -122.06,
                    "description": "Between the redwoods.",
                    "hint": "Look up.",
                    "difficulty": 4,
                    "terrain": 3,
                    "size": 2
                })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let suggested: CacheBody = actix_test::read_body_json(res).await;
    assert!(!suggested.valid);
    assert_eq!(
        (suggested.difficulty, suggested.terrain, suggested.size),
        (4, 3, 2)
    );

    let listing: CachesResponse = member
        .json(&app, actix_test::TestRequest::get().uri("/loadGeoCaches"))
        .await;
    assert!(listing.caches.iter().all(|cache| cache.id != suggested.id));
    let res = member
        .send(
            &app,
            actix_test::TestRequest::get().uri(&format!("/getCache/{}", suggested.id)),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let pending: PendingPage = admin
        .json(&app, actix_test::TestRequest::get().uri("/pending"))
        .await;
    assert_eq!(pending.caches.len(), 1);
    for _ in 0..2 {
        let res = admin
            .send(
                &app,
                actix_test::TestRequest::post()
                    .uri(&pending.approve_cache_url)
                    .set_json(json!({"id": suggested.id})),
            )
            .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = member
        .send(
            &app,
            actix_test::TestRequest::get().uri(&format!("/getCache/{}", suggested.id)),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let detail: Value = actix_test::read_body_json(res).await;
    assert_eq!(detail["cache"]["valid"], true);
    assert_eq!(detail["cache"]["first_name"], "ranger");

    let res = admin
        .send(
            &app,
            actix_test::TestRequest::post()
                .uri(&pending.delete_cache_url)
                .set_json(json!({"id": suggested.id})),
        )
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = member
        .send(
            &app,
            actix_test::TestRequest::get().uri(&format!("/getCache/{}", suggested.id)),
        )
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn logging_respects_the_cooldown() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut browser = Browser::default();
    let user = browser.register(&app, "ranger", "trailhead").await;
    let cache = seed_cache(memory.store.as_ref(), user, "Porter", CacheStatus::Approved).await;
    let info: CacheInfoPage = browser
        .json(
            &app,
            actix_test::TestRequest::get().uri(&format!("/cache_info/{cache}")),
        )
        .await;

    let first: LogResponse = browser
        .json(&app, actix_test::TestRequest::put().uri(&info.log_cache_url))
        .await;
    assert!(first.log.is_some());
    let second: LogResponse = browser
        .json(&app, actix_test::TestRequest::put().uri(&info.log_cache_url))
        .await;
    assert!(second.log.is_none());
    let timer: TimerResponse = browser
        .json(&app, actix_test::TestRequest::get().uri(&info.check_timer_url))
        .await;
    assert!(timer.disabled);

    memory.clock.advance(Duration::from_secs(16 * 60));
    let timer: TimerResponse = browser
        .json(&app, actix_test::TestRequest::get().uri(&info.check_timer_url))
        .await;
    assert!(!timer.disabled);
    let third: LogResponse = browser
        .json(&app, actix_test::TestRequest::put().uri(&info.log_cache_url))
        .await;
    assert!(third.log.is_some());

    let logs: LogsResponse = browser
        .json(&app, actix_test::TestRequest::get().uri(&info.get_logs_url))
        .await;
    assert_eq!(logs.logs.len(), 2);
    assert!(logs.logs.iter().all(|log| log.first_name == "ranger"));
    let limited: LogsResponse = browser
        .json(
            &app,
            actix_test::TestRequest::get().uri(&format!("{}?limit=1", info.get_logs_url)),
        )
        .await;
    assert_eq!(limited.logs.len(), 1);
}

#[actix_web::test]
async fn generated_cache_urls_open_the_detail_page() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut browser = Browser::default();
    let user = browser.register(&app, "ranger", "trailhead").await;
    let cache = seed_cache(memory.store.as_ref(), user, "Porter", CacheStatus::Approved).await;
    let pending = seed_cache(memory.store.as_ref(), user, "Quarry", CacheStatus::Pending).await;

    let map: MapPage = browser
        .json(&app, actix_test::TestRequest::get().uri("/map"))
        .await;
    let generated: UrlResponse = browser
        .json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("{}&cache_id={cache}", map.generate_cache_url)),
        )
        .await;
    let info: CacheInfoPage = browser
        .json(&app, actix_test::TestRequest::get().uri(&generated.url))
        .await;
    assert_eq!(info.cache_id, cache.get());

    let res = browser
        .send(
            &app,
            actix_test::TestRequest::get().uri(&format!("/cache_info/{pending}")),
        )
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), Some("/map"));
}

#[actix_web::test]
async fn bookmarks_page_lists_saved_caches_with_signed_links() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut browser = Browser::default();
    let user = browser.register(&app, "ranger", "trailhead").await;
    let cache = seed_cache(memory.store.as_ref(), user, "Porter", CacheStatus::Approved).await;
    let info: CacheInfoPage = browser
        .json(
            &app,
            actix_test::TestRequest::get().uri(&format!("/cache_info/{cache}")),
        )
        .await;
    let _: BookmarkedResponse = browser
        .json(
            &app,
            actix_test::TestRequest::put().uri(&info.set_bookmarked_url),
        )
        .await;

    let page: Value = browser
        .json(&app, actix_test::TestRequest::get().uri("/bookmarks"))
        .await;
    let url = page["get_bookmarks_url"].as_str().expect("signed url");
    let listing: BookmarksResponse = browser
        .json(&app, actix_test::TestRequest::get().uri(url))
        .await;
    assert_eq!(listing.bookmarks.len(), 1);
    let href = &listing.bookmarks[0].href;
    assert!(href.starts_with(&format!("/cache_info/{cache}?_signature=")));
}

#[actix_web::test]
async fn logout_invalidates_signed_urls() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut browser = Browser::default();
    browser.register(&app, "ranger", "trailhead").await;
    let suggest: SuggestPage = browser
        .json(&app, actix_test::TestRequest::get().uri("/suggest"))
        .await;

    let res = browser
        .send(&app, actix_test::TestRequest::post().uri("/logout"))
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    browser.login(&app, "ranger", "trailhead").await;

    let res = browser
        .send(
            &app,
            actix_test::TestRequest::post()
                .uri(&suggest.add_cache_url)
                .set_json(json!({
                    "cache_name": "Late",
                    "lat": 36.99,
                    "long": -122.06,
                    "difficulty": 1,
                    "terrain": 1,
                    "size": 1
                })),
        )
        .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn get_user_returns_null_for_unknown_ids() {
    let memory = memory_app();
    let app = actix_test::init_service(test_app(&memory)).await;
    let mut browser = Browser::default();

    let body: UserResponse = browser
        .json(
            &app,
            actix_test::TestRequest::post()
                .uri("/getUser")
                .set_json(json!({"id": 999})),
        )
        .await;
    assert!(body.user.is_none());
}
