//! Translation of service outcomes into HTTP responses.

use actix_web::http::StatusCode;
use actix_web::http::header::{ContentType, LOCATION};
use actix_web::{HttpRequest, HttpResponse};
use tracing::debug;

use crate::domain::{Error, ErrorCode, RenderedPage, Response};

use super::state::HttpState;

/// A rendered page as an HTML response.
pub fn html(status: StatusCode, page: RenderedPage) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(ContentType::html())
        .body(page.body)
}

/// A `302 Found` pointing at `location`.
pub fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location))
        .finish()
}

/// Render the not-found page for the current request path.
pub fn not_found_page(state: &HttpState, req: &HttpRequest) -> Result<HttpResponse, Error> {
    let page = state.posts.render_not_found(req.path())?;
    Ok(html(StatusCode::NOT_FOUND, page))
}

/// Turn a handler outcome into a response.
///
/// Pages are rendered with `200 OK`, redirects become `302 Found`, and
/// not-found errors render the not-found page. Other errors propagate to the
/// [`actix_web::ResponseError`] mapping.
pub fn reply(
    state: &HttpState,
    req: &HttpRequest,
    outcome: Result<Response, Error>,
) -> Result<HttpResponse, Error> {
    match outcome {
        Ok(Response::Page(page)) => Ok(html(StatusCode::OK, state.posts.render(&page)?)),
        Ok(Response::Redirect(redirect)) => Ok(found(redirect.location())),
        Err(error) if error.code() == ErrorCode::NotFound => {
            debug!(path = req.path(), message = error.message(), "not found");
            not_found_page(state, req)
        }
        Err(error) => Err(error),
    }
}

/// Where to send an anonymous visitor of `req`: the login page, remembering
/// the requested path in `next`.
pub fn login_redirect(state: &HttpState, req: &HttpRequest) -> HttpResponse {
    let uri = req.uri();
    let next = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |path| path.as_str());
    found(&format!("{}?next={}", state.login_url, encode_query_value(next)))
}

/// `application/x-www-form-urlencoded` encoding of a query value.
fn encode_query_value(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}
