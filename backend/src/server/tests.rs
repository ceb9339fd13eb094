//! Tests for server bootstrap and the assembled application.

use super::*;
use actix_web::cookie::{Key, SameSite};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use geocache::domain::TRACE_ID_HEADER;
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

#[fixture]
fn session() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

fn dependencies(health_state: web::Data<HealthState>, session: SessionSettings) -> AppDependencies {
    let config = ServerConfig::new(session.clone(), "127.0.0.1:0".parse().expect("address"));
    AppDependencies {
        health_state,
        http_state: build_http_state(&config),
        signer: web::Data::new(session.url_signer()),
        session,
    }
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(health_state: web::Data<HealthState>, session: SessionSettings) {
    assert!(!health_state.is_ready(), "state should start unready");

    let config = ServerConfig::new(session, "127.0.0.1:0".parse().expect("address"));
    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[rstest]
#[actix_rt::test]
async fn probes_answer_outside_the_session_scope(
    health_state: web::Data<HealthState>,
    session: SessionSettings,
) {
    health_state.mark_ready();
    let app = actix_test::init_service(build_app(dependencies(health_state, session))).await;

    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/health/ready").to_request())
            .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.response().cookies().next().is_none());
}

#[rstest]
#[actix_rt::test]
async fn application_routes_are_traced(
    health_state: web::Data<HealthState>,
    session: SessionSettings,
) {
    let app = actix_test::init_service(build_app(dependencies(health_state, session))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/loadGeoCaches").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["caches"], Value::Array(Vec::new()));
}

#[rstest]
#[actix_rt::test]
async fn unknown_paths_are_not_found(health_state: web::Data<HealthState>, session: SessionSettings) {
    let app = actix_test::init_service(build_app(dependencies(health_state, session))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/nope").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
