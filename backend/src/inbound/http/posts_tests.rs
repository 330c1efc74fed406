//! Handler-level tests over the in-memory harness.

use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use rstest::rstest;

use crate::domain::Username;
use crate::outbound::render::extract_context;
use crate::test_support::http::TestWorld;

fn location(response: &actix_web::dev::ServiceResponse) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn template_of(body: &str) -> Option<&str> {
    let marker = "data-template=\"";
    let start = body.find(marker)? + marker.len();
    let rest = body.get(start..)?;
    rest.get(..rest.find('"')?)
}

#[rstest]
#[case("/create/", "/auth/login/?next=%2Fcreate%2F")]
#[case("/follow/?page=2", "/auth/login/?next=%2Ffollow%2F%3Fpage%3D2")]
#[case("/profile/leo/follow/", "/auth/login/?next=%2Fprofile%2Fleo%2Ffollow%2F")]
#[actix_web::test]
async fn anonymous_get_is_sent_to_login(#[case] path: &str, #[case] expected: &str) {
    let world = TestWorld::new();
    let app = test::init_service(world.app()).await;

    let response = test::call_service(&app, TestRequest::get().uri(path).to_request()).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), expected);
}

#[actix_web::test]
async fn anonymous_comment_is_sent_to_login() {
    let world = TestWorld::new();
    let app = test::init_service(world.app()).await;

    let request = TestRequest::post()
        .uri("/posts/1/comment/")
        .set_form([("text", "hi")])
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/auth/login/?next=%2Fposts%2F1%2Fcomment%2F");
}

#[actix_web::test]
async fn index_renders_html() {
    let world = TestWorld::new();
    let app = test::init_service(world.app()).await;

    let response = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(content_type.starts_with("text/html"), "got {content_type}");
    let body = test::read_body(response).await;
    let body = std::str::from_utf8(&body).expect("utf-8 body");
    assert_eq!(template_of(body), Some("posts/index.html"));
    let context = extract_context(body).expect("embedded context");
    assert_eq!(context["page_obj"]["count"], 0);
}

#[rstest]
#[case("/no/such/page/")]
#[case("/posts/abc/")]
#[case("/posts/999/")]
#[case("/group/missing/")]
#[case("/profile/nobody/")]
#[actix_web::test]
async fn unknown_resources_render_the_not_found_page(#[case] path: &str) {
    let world = TestWorld::new();
    let app = test::init_service(world.app()).await;

    let response = test::call_service(&app, TestRequest::get().uri(path).to_request()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = test::read_body(response).await;
    let body = std::str::from_utf8(&body).expect("utf-8 body");
    assert_eq!(template_of(body), Some("core/404.html"));
}

#[actix_web::test]
async fn signed_in_author_creates_a_post() {
    let world = TestWorld::new();
    world
        .store
        .add_user(Username::new("alice").expect("valid username"))
        .expect("store user");
    let app = test::init_service(world.app()).await;

    let sign_in =
        test::call_service(&app, TestRequest::get().uri("/test/sign-in/alice/").to_request())
            .await;
    assert_eq!(sign_in.status(), StatusCode::NO_CONTENT);
    let cookie: Cookie<'static> = sign_in
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();

    let request = TestRequest::post()
        .uri("/create/")
        .cookie(cookie)
        .set_form([("text", "First post"), ("group", "")])
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/profile/alice/");
}

#[actix_web::test]
async fn unknown_session_user_counts_as_anonymous() {
    let world = TestWorld::new();
    let app = test::init_service(world.app()).await;

    let sign_in =
        test::call_service(&app, TestRequest::get().uri("/test/sign-in/ghost/").to_request())
            .await;
    let cookie = sign_in
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();

    let request = TestRequest::get().uri("/create/").cookie(cookie).to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/auth/login/?next=%2Fcreate%2F");
}
