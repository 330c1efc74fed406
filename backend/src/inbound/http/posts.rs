//! Blog handlers.
//!
//! ```text
//! GET  /                              index listing (cached)
//! GET  /group/{slug}/                 group listing
//! GET  /profile/{username}/           author profile
//! GET  /posts/{id}/                   post detail
//! GET  /create/                       new post form          (login)
//! POST /create/                       create post            (login)
//! GET  /posts/{id}/edit/              edit form              (login)
//! POST /posts/{id}/edit/              update post            (login)
//! POST /posts/{id}/comment/           add comment            (login)
//! GET  /follow/                       followed authors' feed (login)
//! GET  /profile/{username}/follow/    follow author          (login)
//! GET  /profile/{username}/unfollow/  unfollow author        (login)
//! ```
//!
//! Every listing accepts `?page=`. Anonymous visitors of `(login)` routes are
//! redirected to the configured login page.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use pagination::PageRequest;
use serde::Deserialize;

use crate::domain::{PostId, Response, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::forms::SubmittedForm;
use crate::inbound::http::responses::{html, login_redirect, not_found_page, reply};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// `?page=` query accepted by listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    fn request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref())
    }
}

/// Resolve the session's username to a stored user.
async fn current_user(state: &HttpState, session: &SessionContext) -> ApiResult<Option<User>> {
    match session.username()? {
        Some(username) => state.posts.find_user(username.as_ref()).await,
        None => Ok(None),
    }
}

/// Run `action` for the signed-in user, or redirect to the login page.
macro_rules! with_user {
    ($state:expr, $session:expr, $req:expr, |$user:ident| $action:expr) => {
        match current_user(&$state, &$session).await? {
            Some($user) => {
                let outcome = $action.await.map(Response::from);
                reply(&$state, &$req, outcome)
            }
            None => Ok(login_redirect(&$state, &$req)),
        }
    };
}

#[get("/")]
pub async fn index(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let page = state.posts.list_posts(query.request()).await?;
    Ok(html(StatusCode::OK, page))
}

#[get("/group/{slug}/")]
pub async fn group_list(
    state: web::Data<HttpState>,
    req: HttpRequest,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let outcome = state
        .posts
        .list_group_posts(slug.as_str(), query.request())
        .await
        .map(Response::from);
    reply(&state, &req, outcome)
}

#[get("/profile/{username}/")]
pub async fn profile(
    state: web::Data<HttpState>,
    req: HttpRequest,
    session: SessionContext,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let viewer = current_user(&state, &session).await?;
    let outcome = state
        .posts
        .view_profile(viewer.as_ref(), username.as_str(), query.request())
        .await
        .map(Response::from);
    reply(&state, &req, outcome)
}

#[get("/posts/{id:\\d+}/")]
pub async fn post_detail(
    state: web::Data<HttpState>,
    req: HttpRequest,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let outcome = state
        .posts
        .view_post(PostId::new(id.into_inner()))
        .await
        .map(Response::from);
    reply(&state, &req, outcome)
}

#[get("/create/")]
pub async fn post_create_form(
    state: web::Data<HttpState>,
    req: HttpRequest,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    with_user!(state, session, req, |user| state.posts.create_post_form(&user))
}

#[post("/create/")]
pub async fn post_create(
    state: web::Data<HttpState>,
    req: HttpRequest,
    session: SessionContext,
    form: SubmittedForm,
) -> ApiResult<HttpResponse> {
    with_user!(state, session, req, |user| state.posts.create_post(&user, form.into_post_form()))
}

#[get("/posts/{id:\\d+}/edit/")]
pub async fn post_edit_form(
    state: web::Data<HttpState>,
    req: HttpRequest,
    session: SessionContext,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(id.into_inner());
    with_user!(state, session, req, |user| state.posts.edit_post_form(&user, id))
}

#[post("/posts/{id:\\d+}/edit/")]
pub async fn post_edit(
    state: web::Data<HttpState>,
    req: HttpRequest,
    session: SessionContext,
    id: web::Path<i64>,
    form: SubmittedForm,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(id.into_inner());
    with_user!(state, session, req, |user| state.posts.edit_post(&user, id, form.into_post_form()))
}

#[post("/posts/{id:\\d+}/comment/")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    req: HttpRequest,
    session: SessionContext,
    id: web::Path<i64>,
    form: SubmittedForm,
) -> ApiResult<HttpResponse> {
    let id = PostId::new(id.into_inner());
    with_user!(state, session, req, |user| state.posts.add_comment(&user, id, form.into_comment_form()))
}

#[get("/follow/")]
pub async fn follow_index(
    state: web::Data<HttpState>,
    req: HttpRequest,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let page = query.request();
    with_user!(state, session, req, |user| state.posts.follow_feed(&user, page))
}

#[get("/profile/{username}/follow/")]
pub async fn profile_follow(
    state: web::Data<HttpState>,
    req: HttpRequest,
    session: SessionContext,
    username: web::Path<String>,
) -> ApiResult<HttpResponse> {
    with_user!(state, session, req, |user| state.posts.follow(&user, username.as_str()))
}

#[get("/profile/{username}/unfollow/")]
pub async fn profile_unfollow(
    state: web::Data<HttpState>,
    req: HttpRequest,
    session: SessionContext,
    username: web::Path<String>,
) -> ApiResult<HttpResponse> {
    with_user!(state, session, req, |user| state.posts.unfollow(&user, username.as_str()))
}

/// Fallback for unknown paths.
pub async fn not_found(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    not_found_page(&state, &req)
}

/// Register every blog route.
///
/// The not-found fallback is installed separately with
/// `App::default_service(web::to(not_found))`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(group_list)
        .service(profile)
        .service(post_detail)
        .service(post_create_form)
        .service(post_create)
        .service(post_edit_form)
        .service(post_edit)
        .service(add_comment)
        .service(follow_index)
        .service(profile_follow)
        .service(profile_unfollow);
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
