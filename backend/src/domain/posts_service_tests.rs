//! Tests for the posts service against mocked ports.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use mockall::predicate::eq;
use pagination::PageRequest;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::ports::{
    MockCommentRepository, MockFollowRepository, MockGroupRepository, MockImageStore,
    MockPageCache, MockPageRenderer, MockPostRepository, MockUserRepository,
};
use crate::domain::{
    Comment, CommentText, ErrorCode, GroupId, PostText, UploadedImage, UserId,
    forms::INVALID_CHOICE_MESSAGE,
};
use crate::test_support::{MutableClock, SMALL_GIF};


fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn user(id: i64, name: &str) -> User {
    User::new(UserId::new(id), Username::new(name).expect("valid username"))
}

fn group(id: i64, slug: &str) -> Group {
    Group::new(
        GroupId::new(id),
        format!("Group {slug}"),
        GroupSlug::new(slug).expect("valid slug"),
        "description",
    )
}

fn post(id: i64, author: &User, group: Option<Group>) -> Post {
    Post::new(
        PostId::new(id),
        author.clone(),
        PostText::new(format!("post number {id}")).expect("valid text"),
        now(),
        group,
        None,
    )
}

fn post_form(text: &str, group: &str) -> PostForm {
    PostForm {
        text: Some(text.to_owned()),
        group: Some(group.to_owned()),
        image: None,
    }
}

#[fixture]
fn author() -> User {
    user(1, "author")
}

#[fixture]
fn reader() -> User {
    user(2, "reader")
}

/// Port mocks with no expectations; any unexpected call fails the test.
#[derive(Default)]
struct Mocks {
    users: MockUserRepository,
    groups: MockGroupRepository,
    posts: MockPostRepository,
    comments: MockCommentRepository,
    follows: MockFollowRepository,
    cache: MockPageCache,
    images: MockImageStore,
    renderer: MockPageRenderer,
}

impl Mocks {
    fn with_user(mut self, found: User) -> Self {
        let name = found.username().clone();
        self.users
            .expect_find_by_username()
            .with(eq(name))
            .return_once(move |_| Ok(Some(found)));
        self
    }

    fn with_post(mut self, found: Post) -> Self {
        self.posts
            .expect_find_by_id()
            .with(eq(found.id()))
            .return_once(move |_| Ok(Some(found)));
        self
    }

    fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups
            .expect_list_all()
            .return_once(move || Ok(groups));
        self
    }

    fn into_service(self) -> PostsService {
        let ports = PostsPorts {
            users: Arc::new(self.users),
            groups: Arc::new(self.groups),
            posts: Arc::new(self.posts),
            comments: Arc::new(self.comments),
            follows: Arc::new(self.follows),
            cache: Arc::new(self.cache),
            images: Arc::new(self.images),
            renderer: Arc::new(self.renderer),
        };
        PostsService::new(ports, Arc::new(MutableClock::new(now())))
    }
}

fn expect_page(response: Response) -> Page {
    match response {
        Response::Page(page) => page,
        Response::Redirect(redirect) => panic!("expected page, got redirect to {}", redirect.location()),
    }
}

fn expect_redirect(response: Response) -> Redirect {
    match response {
        Response::Redirect(redirect) => redirect,
        Response::Page(page) => panic!("expected redirect, got {}", page.template().name()),
    }
}

#[rstest]
#[tokio::test]
async fn list_posts_serves_cache_hit_without_touching_storage() {
    let mut mocks = Mocks::default();
    mocks.cache.expect_get().times(1).return_once(|_| {
        Ok(Some(RenderedPage {
            template: Template::Index,
            body: "cached".to_owned(),
        }))
    });
    let service = mocks.into_service();

    let page = service
        .list_posts(PageRequest::FIRST)
        .await
        .expect("cached page");

    assert_eq!(page.body, "cached");
}

#[rstest]
#[tokio::test]
async fn list_posts_renders_first_page_and_caches_it(author: User) {
    let mut mocks = Mocks::default();
    mocks.cache.expect_get().return_once(|_| Ok(None));
    mocks
        .cache
        .expect_set()
        .withf(|key, page, ttl| {
            key.as_str() == INDEX_CACHE_KEY && page.body == "rendered" && *ttl == INDEX_CACHE_TTL
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));
    mocks
        .posts
        .expect_count()
        .with(eq(PostFilter::All))
        .return_once(|_| Ok(13));
    let listed: Vec<Post> = (1..=10).map(|id| post(id, &author, None)).collect();
    mocks
        .posts
        .expect_list()
        .with(eq(PostFilter::All), eq(0), eq(PAGE_SIZE))
        .return_once(move |_, _, _| Ok(listed));
    mocks.renderer.expect_render().return_once(|page| {
        assert_eq!(page.template(), Template::Index);
        let page_obj = page.get("page_obj").expect("page_obj in context");
        assert_eq!(page_obj["items"].as_array().map(Vec::len), Some(10));
        assert_eq!(page_obj["num_pages"], json!(2));
        Ok("rendered".to_owned())
    });
    let service = mocks.into_service();

    let page = service
        .list_posts(PageRequest::FIRST)
        .await
        .expect("rendered page");

    assert_eq!(page.body, "rendered");
}

#[rstest]
#[tokio::test]
async fn second_page_of_thirteen_posts_requests_remaining_three(author: User) {
    let mut mocks = Mocks::default();
    mocks.posts.expect_count().return_once(|_| Ok(13));
    let listed: Vec<Post> = (11..=13).map(|id| post(id, &author, None)).collect();
    mocks
        .posts
        .expect_list()
        .with(eq(PostFilter::Author(author.id())), eq(10), eq(3))
        .return_once(move |_, _, _| Ok(listed));
    let service = mocks.with_user(author.clone()).into_service();

    let page = service
        .view_profile(None, "author", PageRequest::Number(2))
        .await
        .expect("profile page");

    assert_eq!(page.get("page_obj").map(|obj| obj["items"].as_array().map(Vec::len)), Some(Some(3)));
    assert_eq!(page.get("post_count"), Some(&json!(13)));
    assert_eq!(page.get("following"), Some(&json!(false)));
}

#[rstest]
#[case("no-such-group")]
#[case("not a slug")]
#[tokio::test]
async fn list_group_posts_rejects_unknown_groups(#[case] slug: &str) {
    let mut mocks = Mocks::default();
    mocks.groups.expect_find_by_slug().returning(|_| Ok(None));
    let service = mocks.into_service();

    let error = service
        .list_group_posts(slug, PageRequest::FIRST)
        .await
        .expect_err("unknown group");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_group_posts_filters_by_group(author: User) {
    let cats = group(4, "cats");
    let mut mocks = Mocks::default();
    let found = cats.clone();
    mocks
        .groups
        .expect_find_by_slug()
        .return_once(move |_| Ok(Some(found)));
    mocks
        .posts
        .expect_count()
        .with(eq(PostFilter::Group(cats.id())))
        .return_once(|_| Ok(1));
    let listed = vec![post(1, &author, Some(cats.clone()))];
    mocks
        .posts
        .expect_list()
        .with(eq(PostFilter::Group(cats.id())), eq(0), eq(1))
        .return_once(move |_, _, _| Ok(listed));
    let service = mocks.into_service();

    let page = service
        .list_group_posts("cats", PageRequest::FIRST)
        .await
        .expect("group page");

    assert_eq!(page.template(), Template::GroupList);
    assert_eq!(page.get("group").map(|group| &group["slug"]), Some(&json!("cats")));
    assert_eq!(page.get("posts").and_then(|posts| posts.as_array()).map(Vec::len), Some(1));
}

#[rstest]
#[tokio::test]
async fn empty_listing_skips_slice_query() {
    let mut mocks = Mocks::default();
    mocks.posts.expect_count().return_once(|_| Ok(0));
    mocks.posts.expect_list().never();
    let viewer = user(9, "lonely");
    let service = mocks.into_service();

    let page = service
        .follow_feed(&viewer, PageRequest::FIRST)
        .await
        .expect("feed page");

    assert_eq!(page.template(), Template::Follow);
    assert_eq!(page.get("page_obj").map(|obj| &obj["number"]), Some(&json!(1)));
}

#[rstest]
#[tokio::test]
async fn follow_feed_selects_followed_authors(reader: User) {
    let mut mocks = Mocks::default();
    mocks
        .posts
        .expect_count()
        .with(eq(PostFilter::FollowedBy(reader.id())))
        .return_once(|_| Ok(0));
    let service = mocks.into_service();

    service
        .follow_feed(&reader, PageRequest::FIRST)
        .await
        .expect("feed page");
}

#[rstest]
#[tokio::test]
async fn view_profile_reports_following_for_subscribers(author: User, reader: User) {
    let mut mocks = Mocks::default();
    mocks.posts.expect_count().return_once(|_| Ok(0));
    mocks
        .follows
        .expect_exists()
        .withf(|follow| follow.user() == UserId::new(2) && follow.author() == UserId::new(1))
        .return_once(|_| Ok(true));
    let service = mocks.with_user(author).into_service();

    let page = service
        .view_profile(Some(&reader), "author", PageRequest::FIRST)
        .await
        .expect("profile page");

    assert_eq!(page.get("following"), Some(&json!(true)));
}

#[rstest]
#[tokio::test]
async fn view_profile_of_self_is_never_following(author: User) {
    let mut mocks = Mocks::default();
    mocks.posts.expect_count().return_once(|_| Ok(0));
    mocks.follows.expect_exists().never();
    let service = mocks.with_user(author.clone()).into_service();

    let page = service
        .view_profile(Some(&author), "author", PageRequest::FIRST)
        .await
        .expect("profile page");

    assert_eq!(page.get("following"), Some(&json!(false)));
}

#[rstest]
#[tokio::test]
async fn view_profile_rejects_unknown_user() {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_username()
        .return_once(|_| Ok(None));
    let service = mocks.into_service();

    let error = service
        .view_profile(None, "ghost", PageRequest::FIRST)
        .await
        .expect_err("unknown user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn view_post_includes_comments_and_author_post_count(author: User, reader: User) {
    let target = post(7, &author, None);
    let mut mocks = Mocks::default().with_post(target);
    let comment = Comment::new(
        crate::domain::CommentId::new(1),
        PostId::new(7),
        reader,
        CommentText::new("nice").expect("valid text"),
        now(),
    );
    mocks
        .comments
        .expect_list_for_post()
        .with(eq(PostId::new(7)))
        .return_once(move |_| Ok(vec![comment]));
    mocks
        .posts
        .expect_count()
        .with(eq(PostFilter::Author(author.id())))
        .return_once(|_| Ok(5));
    let service = mocks.into_service();

    let page = service.view_post(PostId::new(7)).await.expect("detail page");

    assert_eq!(page.template(), Template::PostDetail);
    assert_eq!(page.get("post_count"), Some(&json!(5)));
    assert_eq!(page.get("image"), Some(&json!(null)));
    assert_eq!(page.get("comments").and_then(|c| c.as_array()).map(Vec::len), Some(1));
    assert_eq!(page.get("form").map(|form| &form["values"]["text"]), Some(&json!("")));
}

#[rstest]
#[tokio::test]
async fn view_post_rejects_unknown_post() {
    let mut mocks = Mocks::default();
    mocks.posts.expect_find_by_id().return_once(|_| Ok(None));
    let service = mocks.into_service();

    let error = service.view_post(PostId::new(99)).await.expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn create_post_stores_with_current_author_and_redirects_to_profile(author: User) {
    let mut mocks = Mocks::default().with_groups(vec![group(3, "cats")]);
    let created_by = author.clone();
    mocks
        .posts
        .expect_create()
        .withf(|new_post| {
            new_post.author == UserId::new(1)
                && new_post.text.as_ref() == "Hello"
                && new_post.group == Some(GroupId::new(3))
                && new_post.image.is_none()
                && new_post.pub_date == now()
        })
        .times(1)
        .return_once(move |_| Ok(post(11, &created_by, None)));
    let service = mocks.into_service();

    let response = service
        .create_post(&author, post_form(" Hello ", "3"))
        .await
        .expect("post created");

    assert_eq!(expect_redirect(response).location(), "/profile/author/");
}

#[rstest]
#[tokio::test]
async fn create_post_with_image_stores_it_first(author: User) {
    let mut mocks = Mocks::default().with_groups(Vec::new());
    mocks
        .images
        .expect_store()
        .withf(|image| image.file_name() == "small.gif")
        .times(1)
        .return_once(|_| Ok(PostImage::new("posts/small.gif").expect("valid path")));
    let created_by = author.clone();
    mocks
        .posts
        .expect_create()
        .withf(|new_post| new_post.image.as_ref().map(PostImage::path) == Some("posts/small.gif"))
        .return_once(move |_| Ok(post(12, &created_by, None)));
    let service = mocks.into_service();

    let mut form = post_form("With picture", "");
    form.image = Some(UploadedImage {
        file_name: "small.gif".to_owned(),
        content_type: Some("image/gif".to_owned()),
        bytes: SMALL_GIF.to_vec(),
    });
    let response = service.create_post(&author, form).await.expect("created");

    expect_redirect(response);
}

fn gif_upload() -> UploadedImage {
    UploadedImage {
        file_name: "small.gif".to_owned(),
        content_type: Some("image/gif".to_owned()),
        bytes: SMALL_GIF.to_vec(),
    }
}

fn expect_stored_gif(mocks: &mut Mocks) {
    mocks
        .images
        .expect_store()
        .return_once(|_| Ok(PostImage::new("posts/small.gif").expect("valid path")));
}

#[rstest]
#[tokio::test]
async fn create_post_removes_image_when_saving_fails(author: User) {
    let mut mocks = Mocks::default().with_groups(Vec::new());
    expect_stored_gif(&mut mocks);
    mocks
        .posts
        .expect_create()
        .return_once(|_| Err(PostPersistenceError::connection("refused")));
    mocks
        .images
        .expect_remove()
        .withf(|image| image.path() == "posts/small.gif")
        .times(1)
        .return_once(|_| Ok(()));
    let service = mocks.into_service();

    let mut form = post_form("With picture", "");
    form.image = Some(gif_upload());
    let error = service.create_post(&author, form).await.expect_err("save failed");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn edit_post_removes_new_image_when_the_post_vanished(author: User) {
    let mut mocks = Mocks::default()
        .with_post(post(7, &author, None))
        .with_groups(Vec::new());
    expect_stored_gif(&mut mocks);
    mocks.posts.expect_update().return_once(|_, _| Ok(None));
    mocks
        .images
        .expect_remove()
        .times(1)
        .return_once(|_| Ok(()));
    let service = mocks.into_service();

    let mut form = post_form("Edited", "");
    form.image = Some(gif_upload());
    let error = service
        .edit_post(&author, PostId::new(7), form)
        .await
        .expect_err("post vanished");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn failed_edit_without_upload_keeps_stored_image(author: User) {
    let mut mocks = Mocks::default()
        .with_post(post(7, &author, None))
        .with_groups(Vec::new());
    mocks
        .posts
        .expect_update()
        .return_once(|_, _| Err(PostPersistenceError::query("syntax")));
    mocks.images.expect_remove().never();
    let service = mocks.into_service();

    let error = service
        .edit_post(&author, PostId::new(7), post_form("Edited", ""))
        .await
        .expect_err("update failed");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[tokio::test]
async fn create_post_rerenders_form_on_invalid_input(author: User) {
    let mut mocks = Mocks::default().with_groups(vec![group(3, "cats")]);
    mocks.posts.expect_create().never();
    mocks.images.expect_store().never();
    let service = mocks.into_service();

    let response = service
        .create_post(&author, post_form("Text", "42"))
        .await
        .expect("form page");

    let page = expect_page(response);
    assert_eq!(page.template(), Template::PostCreate);
    let form = page.get("form").expect("form in context");
    assert_eq!(form["errors"]["group"], json!([INVALID_CHOICE_MESSAGE]));
    assert_eq!(form["values"]["text"], json!("Text"));
    assert_eq!(page.get("is_edit"), None);
}

#[rstest]
#[tokio::test]
async fn edit_post_by_non_author_redirects_without_changes(author: User, reader: User) {
    let mut mocks = Mocks::default().with_post(post(5, &author, None));
    mocks.posts.expect_update().never();
    mocks.groups.expect_list_all().never();
    let service = mocks.into_service();

    let response = service
        .edit_post(&reader, PostId::new(5), post_form("Hijacked", ""))
        .await
        .expect("silent refusal");

    assert_eq!(expect_redirect(response).location(), "/posts/5/");
}

#[rstest]
#[tokio::test]
async fn edit_post_form_for_non_author_redirects(author: User, reader: User) {
    let service = Mocks::default()
        .with_post(post(5, &author, None))
        .into_service();

    let response = service
        .edit_post_form(&reader, PostId::new(5))
        .await
        .expect("silent refusal");

    assert_eq!(expect_redirect(response).location(), "/posts/5/");
}

#[rstest]
#[tokio::test]
async fn edit_post_form_prefills_current_values(author: User) {
    let cats = group(3, "cats");
    let service = Mocks::default()
        .with_post(post(5, &author, Some(cats.clone())))
        .with_groups(vec![cats])
        .into_service();

    let response = service
        .edit_post_form(&author, PostId::new(5))
        .await
        .expect("edit form");

    let page = expect_page(response);
    assert_eq!(page.get("is_edit"), Some(&json!(true)));
    assert_eq!(page.get("post_id"), Some(&json!(5)));
    let form = page.get("form").expect("form in context");
    assert_eq!(form["values"], json!({"text": "post number 5", "group": "3"}));
}

#[rstest]
#[tokio::test]
async fn edit_post_by_author_replaces_fields(author: User) {
    let cats = group(3, "cats");
    let mut mocks = Mocks::default()
        .with_post(post(5, &author, None))
        .with_groups(vec![cats.clone()]);
    let updated = post(5, &author, Some(cats));
    mocks
        .posts
        .expect_update()
        .withf(|id, update| {
            *id == PostId::new(5)
                && update.text.as_ref() == "Edited"
                && update.group == Some(GroupId::new(3))
                && update.image.is_none()
        })
        .times(1)
        .return_once(move |_, _| Ok(Some(updated)));
    let service = mocks.into_service();

    let response = service
        .edit_post(&author, PostId::new(5), post_form("Edited", "3"))
        .await
        .expect("post updated");

    assert_eq!(expect_redirect(response).location(), "/posts/5/");
}

#[rstest]
#[tokio::test]
async fn edit_post_rerenders_with_errors(author: User) {
    let mut mocks = Mocks::default()
        .with_post(post(5, &author, None))
        .with_groups(Vec::new());
    mocks.posts.expect_update().never();
    let service = mocks.into_service();

    let response = service
        .edit_post(&author, PostId::new(5), post_form("   ", ""))
        .await
        .expect("form page");

    let page = expect_page(response);
    assert_eq!(page.get("is_edit"), Some(&json!(true)));
    assert!(page.get("form").is_some_and(|form| form["errors"]["text"].is_array()));
}

#[rstest]
#[tokio::test]
async fn add_comment_creates_and_redirects(author: User, reader: User) {
    let mut mocks = Mocks::default().with_post(post(5, &author, None));
    let commenter = reader.clone();
    mocks
        .comments
        .expect_create()
        .withf(|comment| {
            comment.post == PostId::new(5)
                && comment.author == UserId::new(2)
                && comment.text.as_ref() == "Great"
        })
        .times(1)
        .return_once(move |new| {
            Ok(Comment::new(
                crate::domain::CommentId::new(1),
                new.post,
                commenter,
                new.text.clone(),
                new.created,
            ))
        });
    let service = mocks.into_service();

    let redirect = service
        .add_comment(
            &reader,
            PostId::new(5),
            CommentForm {
                text: Some("Great".to_owned()),
            },
        )
        .await
        .expect("comment added");

    assert_eq!(redirect.location(), "/posts/5/");
}

#[rstest]
#[tokio::test]
async fn add_comment_silently_drops_blank_text(author: User, reader: User) {
    let mut mocks = Mocks::default().with_post(post(5, &author, None));
    mocks.comments.expect_create().never();
    let service = mocks.into_service();

    let redirect = service
        .add_comment(&reader, PostId::new(5), CommentForm { text: Some("  ".to_owned()) })
        .await
        .expect("redirect");

    assert_eq!(redirect.location(), "/posts/5/");
}

#[rstest]
#[tokio::test]
async fn add_comment_rejects_unknown_post(reader: User) {
    let mut mocks = Mocks::default();
    mocks.posts.expect_find_by_id().return_once(|_| Ok(None));
    let service = mocks.into_service();

    let error = service
        .add_comment(&reader, PostId::new(5), CommentForm::default())
        .await
        .expect_err("missing post");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn follow_inserts_if_absent_and_redirects(author: User, reader: User) {
    let mut mocks = Mocks::default().with_user(author);
    mocks
        .follows
        .expect_insert_if_absent()
        .withf(|follow| follow.user() == UserId::new(2) && follow.author() == UserId::new(1))
        .times(1)
        .return_once(|_| Ok(true));
    let service = mocks.into_service();

    let redirect = service.follow(&reader, "author").await.expect("followed");

    assert_eq!(redirect.location(), "/profile/author/");
}

#[rstest]
#[tokio::test]
async fn following_yourself_is_a_no_op(author: User) {
    let mut mocks = Mocks::default().with_user(author.clone());
    mocks.follows.expect_insert_if_absent().never();
    let service = mocks.into_service();

    let redirect = service.follow(&author, "author").await.expect("redirect");

    assert_eq!(redirect.location(), "/profile/author/");
}

#[rstest]
#[tokio::test]
async fn unfollow_deletes_and_redirects(author: User, reader: User) {
    let mut mocks = Mocks::default().with_user(author);
    mocks
        .follows
        .expect_delete()
        .times(1)
        .return_once(|_| Ok(false));
    let service = mocks.into_service();

    let redirect = service.unfollow(&reader, "author").await.expect("unfollowed");

    assert_eq!(redirect.location(), "/profile/author/");
}

#[rstest]
#[tokio::test]
async fn unfollow_unknown_user_is_not_found(reader: User) {
    let mut mocks = Mocks::default();
    mocks
        .users
        .expect_find_by_username()
        .return_once(|_| Ok(None));
    let service = mocks.into_service();

    let error = service.unfollow(&reader, "ghost").await.expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(PostPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(PostPersistenceError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_failures_map_to_error_codes(
    #[case] failure: PostPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut mocks = Mocks::default();
    mocks
        .posts
        .expect_find_by_id()
        .return_once(move |_| Err(failure));
    let service = mocks.into_service();

    let error = service.view_post(PostId::new(1)).await.expect_err("failure");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn find_user_ignores_malformed_names() {
    let mut mocks = Mocks::default();
    mocks.users.expect_find_by_username().never();
    let service = mocks.into_service();

    let found = service.find_user("not a name").await.expect("lookup");

    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
async fn clear_cache_delegates_to_port() {
    let mut mocks = Mocks::default();
    mocks.cache.expect_clear().times(1).return_once(|| Ok(()));
    let service = mocks.into_service();

    service.clear_cache().await.expect("cache cleared");
}
