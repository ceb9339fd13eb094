//! HTTP mapping for domain errors.
//!
//! Handlers return [`crate::domain::ApiResult`]; this module turns the error
//! side into a JSON body with a matching status code. Internal failures are
//! redacted before leaving the process.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn client_payload(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    error!(message = error.message(), "internal error returned to client");
    let redacted = Error::internal("Internal server error");
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(client_payload(self))
    }
}

fn extractor_error(source: &'static str, message: String) -> actix_web::Error {
    debug!(source, %message, "request extraction failed");
    Error::invalid_request(message)
        .with_details(json!({ "source": source, "code": "malformed" }))
        .into()
}

/// Error handler for `web::JsonConfig` so malformed bodies use the shared
/// error schema.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    extractor_error("body", err.to_string())
}

/// Error handler for `web::QueryConfig`.
pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    extractor_error("query", err.to_string())
}

/// Error handler for `web::PathConfig`.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    extractor_error("path", err.to_string())
}
