//! Shared HTTP helpers for the blog integration tests.
//!
//! Each helper drives the full application built by
//! [`TestWorld::app`](yatube::test_support::http::TestWorld::app): requests go
//! through the session, trace and routing layers exactly as in production.

#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use serde_json::Value;
use yatube::domain::{Group, GroupSlug, User, Username};
use yatube::outbound::render::extract_context;
use yatube::test_support::http::TestWorld;

pub const BOUNDARY: &str = "yatube-boundary";

/// A rendered page: status, template name and embedded context.
#[derive(Debug)]
pub struct Rendered {
    pub status: StatusCode,
    pub template: String,
    pub body: String,
    pub context: Value,
}

impl Rendered {
    /// Items of the page's `page_obj`.
    pub fn items(&self) -> &[Value] {
        self.context["page_obj"]["items"]
            .as_array()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Texts of the listed posts, in display order.
    pub fn texts(&self) -> Vec<String> {
        self.items()
            .iter()
            .filter_map(|post| post["text"].as_str().map(str::to_owned))
            .collect()
    }
}

pub fn add_user(world: &TestWorld, name: &str) -> User {
    let username = Username::new(name).expect("valid username");
    world.store.add_user(username).expect("store user")
}

pub fn add_group(world: &TestWorld, title: &str, slug: &str) -> Group {
    let slug = GroupSlug::new(slug).expect("valid slug");
    world
        .store
        .add_group(title, slug, "A test group")
        .expect("store group")
}

/// Sign in as `username` and return the session cookie.
pub async fn sign_in<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let uri = format!("/test/sign-in/{username}/");
    let response = test::call_service(app, TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// GET `path` and decode the rendered page.
pub async fn get_page<S, B>(app: &S, path: &str, cookie: Option<&Cookie<'static>>) -> Rendered
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut request = TestRequest::get().uri(path);
    if let Some(cookie) = cookie {
        request = request.cookie(cookie.clone());
    }
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = String::from_utf8(bytes.to_vec()).expect("utf-8 body");
    let template = template_of(&body).unwrap_or_default().to_owned();
    let context = extract_context(&body).unwrap_or(Value::Null);
    Rendered {
        status,
        template,
        body,
        context,
    }
}

/// GET `path` and return the redirect target.
pub async fn get_redirect<S, B>(app: &S, path: &str, cookie: &Cookie<'static>) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = TestRequest::get().uri(path).cookie(cookie.clone());
    let response = test::call_service(app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::FOUND, "GET {path}");
    location(&response)
}

/// POST an urlencoded form and return the response status and location.
pub async fn post_form<S, B>(
    app: &S,
    path: &str,
    cookie: &Cookie<'static>,
    fields: &[(&str, &str)],
) -> (StatusCode, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = TestRequest::post()
        .uri(path)
        .cookie(cookie.clone())
        .set_form(fields)
        .to_request();
    let response = test::call_service(app, request).await;
    (response.status(), location(&response))
}

/// POST a multipart form with an optional image part.
pub async fn post_multipart<S, B>(
    app: &S,
    path: &str,
    cookie: &Cookie<'static>,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> (StatusCode, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = TestRequest::post()
        .uri(path)
        .cookie(cookie.clone())
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(fields, image))
        .to_request();
    let response = test::call_service(app, request).await;
    (response.status(), location(&response))
}

/// Create a post as the signed-in user and return its id.
pub async fn create_post<S, B>(
    app: &S,
    cookie: &Cookie<'static>,
    text: &str,
    group: Option<&Group>,
) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let group_id = group.map(|group| group.id().to_string()).unwrap_or_default();
    let (status, target) = post_form(
        app,
        "/create/",
        cookie,
        &[("text", text), ("group", group_id.as_str())],
    )
    .await;
    assert_eq!(status, StatusCode::FOUND, "create {text}");
    let profile = get_page(app, &target, None).await;
    profile
        .items()
        .iter()
        .find(|post| post["text"] == text)
        .and_then(|post| post["id"].as_i64())
        .expect("created post listed on the profile")
}

pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn location<B>(response: &ServiceResponse<B>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

fn template_of(body: &str) -> Option<&str> {
    let marker = "data-template=\"";
    let start = body.find(marker)? + marker.len();
    let rest = body.get(start..)?;
    rest.get(..rest.find('"')?)
}
