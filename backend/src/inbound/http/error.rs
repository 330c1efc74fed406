//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while letting Actix
//! handlers turn failures into a small HTML error document with a matching
//! status code. Not-found conditions raised by the posts service are usually
//! intercepted earlier and rendered through the `core/404.html` template;
//! this mapping is the fallback for everything else.

use actix_web::http::header::{ContentType, HeaderName};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The message shown to the client; internal detail never leaves the process.
fn public_message(error: &Error) -> &str {
    match error.code() {
        ErrorCode::InternalError => REDACTED_MESSAGE,
        _ => error.message(),
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn error_document(status: StatusCode, message: &str, trace_id: Option<&str>) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let trace = trace_id
        .map(|id| format!("<p class=\"trace-id\">{}</p>", escape_html(id)))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{code} {title}</title></head>\n<body>\n<h1>{title}</h1>\n<p>{message}</p>\n{trace}\n</body>\n</html>\n",
        code = status.as_u16(),
        message = escape_html(message),
    )
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = ?self.code(), message = self.message(), trace_id = ?self.trace_id(), "request failed");
        }
        let mut builder = HttpResponse::build(status);
        builder.insert_header(ContentType::html());
        let trace_header = HeaderName::try_from(TRACE_ID_HEADER)
            .ok()
            .zip(self.trace_id());
        if let Some((name, id)) = trace_header {
            builder.insert_header((name, id.to_owned()));
        }
        builder.body(error_document(
            status,
            public_message(self),
            self.trace_id(),
        ))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}
