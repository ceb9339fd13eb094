//! Request tracing middleware.
//!
//! Every request runs inside a [`TraceId`] scope. A well-formed `trace-id`
//! request header is reused so callers can correlate retries; anything else
//! gets a fresh identifier. The identifier is echoed on the response and
//! stamped onto error payloads by [`crate::domain::Error`] constructors.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, error, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware binding a [`TraceId`] to each request.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use geocache::Trace;
///
/// let _app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

fn incoming_trace_id(req: &ServiceRequest) -> Option<TraceId> {
    req.headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(TraceId::from_header)
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = incoming_trace_id(&req).unwrap_or_else(TraceId::generate);
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path()
        );
        let fut = self.service.call(req);
        Box::pin(TraceId::scope(
            trace_id,
            async move {
                let mut res = fut.await?;
                match HeaderValue::from_str(&trace_id.to_string()) {
                    Ok(value) => {
                        res.response_mut()
                            .headers_mut()
                            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                    }
                    Err(err) => error!(error = %err, "trace id is not a valid header value"),
                }
                Ok(res)
            }
            .instrument(span),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiResult, Error as DomainError};
    use actix_web::{App, HttpResponse, test, web};

    const FIXED: &str = "8b0f4f0e-2c4b-4d8e-9c55-3d7a2f1e6b90";

    async fn echo_trace_id() -> HttpResponse {
        let id = TraceId::current().map(|id| id.to_string()).unwrap_or_default();
        HttpResponse::Ok().body(id)
    }

    #[actix_web::test]
    async fn generates_header_and_scope() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(echo_trace_id)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("ascii header")
            .to_owned();
        let body = test::read_body(res).await;
        assert_eq!(body, header.as_bytes());
        assert!(TraceId::from_header(&header).is_some());
    }

    #[actix_web::test]
    async fn reuses_a_valid_incoming_identifier() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(echo_trace_id)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((TRACE_ID_HEADER, FIXED))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(
            res.headers().get(TRACE_ID_HEADER).and_then(|v| v.to_str().ok()),
            Some(FIXED)
        );
    }

    #[actix_web::test]
    async fn ignores_malformed_incoming_identifier() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(echo_trace_id)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((TRACE_ID_HEADER, "not-a-uuid"))
            .to_request();
        let res = test::call_service(&app, req).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .expect("trace id header");
        assert_ne!(header, "not-a-uuid");
    }

    #[actix_web::test]
    async fn error_payload_carries_the_trace_id() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async { ApiResult::<HttpResponse>::Err(DomainError::not_found("gone")) }),
        ))
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((TRACE_ID_HEADER, FIXED))
            .to_request();
        let res = test::call_service(&app, req).await;
        let body: DomainError = test::read_body_json(res).await;
        assert_eq!(body.trace_id(), Some(FIXED));
    }
}
