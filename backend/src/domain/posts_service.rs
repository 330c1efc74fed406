//! Posts service: orchestration of every user-facing posts operation.
//!
//! Each operation takes the current user explicitly (`None` for anonymous
//! viewers), talks to the ports, and returns a [`Page`] to render or a
//! [`Redirect`]. Authentication itself is the caller's concern: operations
//! that take `&User` assume the caller has already required a login.

use std::sync::Arc;

use mockable::Clock;
use pagination::{PageRequest, Paginator};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::page_cache::{INDEX_CACHE_KEY, INDEX_CACHE_TTL, get_or_render};
use super::ports::{
    CacheKey, CommentPersistenceError, CommentRepository, FollowPersistenceError,
    FollowRepository, GroupPersistenceError, GroupRepository, ImageStore, PageCache,
    PageRenderer, PostPersistenceError, PostRepository, UserPersistenceError, UserRepository,
};
use super::{
    CommentForm, Error, Follow, FormErrors, Group, GroupId, GroupSlug, NewComment, NewPost, Page,
    Post, PostFilter, PostForm, PostFormValues, PostId, PostImage, PostUpdate, Redirect,
    RenderedPage, Response, Template, User, Username, ValidImage, validate_comment,
    validate_post,
};

/// Items per page on every listing.
pub const PAGE_SIZE: u64 = 10;

const PAGINATOR: Paginator = match Paginator::new(PAGE_SIZE) {
    Ok(paginator) => paginator,
    Err(_) => panic!("page size must be non-zero"),
};

macro_rules! persistence_error_mapper {
    ($name:ident, $error:ident, $label:literal) => {
        fn $name(error: $error) -> Error {
            match error {
                $error::Connection { message } => Error::service_unavailable(format!(
                    concat!($label, " repository unavailable: {}"),
                    message
                )),
                $error::Query { message } => {
                    Error::internal(format!(concat!($label, " repository error: {}"), message))
                }
            }
        }
    };
}

persistence_error_mapper!(map_user_error, UserPersistenceError, "user");
persistence_error_mapper!(map_group_error, GroupPersistenceError, "group");
persistence_error_mapper!(map_post_error, PostPersistenceError, "post");
persistence_error_mapper!(map_comment_error, CommentPersistenceError, "comment");
persistence_error_mapper!(map_follow_error, FollowPersistenceError, "follow");

/// Form state as handed to templates.
#[derive(Debug, Serialize)]
struct FormContext<V> {
    values: V,
    errors: FormErrors,
}

impl<V> FormContext<V> {
    fn new(values: V) -> Self {
        Self {
            values,
            errors: FormErrors::default(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct CommentFormValues {
    text: String,
}

/// Driven ports the service depends on.
#[derive(Clone)]
pub struct PostsPorts {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub cache: Arc<dyn PageCache>,
    pub images: Arc<dyn ImageStore>,
    pub renderer: Arc<dyn PageRenderer>,
}

/// Orchestrates listings, post authoring, comments and follows.
#[derive(Clone)]
pub struct PostsService {
    ports: PostsPorts,
    clock: Arc<dyn Clock>,
}

impl PostsService {
    /// Create a service over the given ports.
    pub fn new(ports: PostsPorts, clock: Arc<dyn Clock>) -> Self {
        Self { ports, clock }
    }

    /// Index listing of every post, served through the page cache.
    pub async fn list_posts(&self, page: PageRequest) -> Result<RenderedPage, Error> {
        let key = CacheKey::new(INDEX_CACHE_KEY)
            .map_err(|err| Error::internal(format!("invalid index cache key: {err}")))?;
        get_or_render(self.ports.cache.as_ref(), &key, INDEX_CACHE_TTL, || async {
            let page_obj = self.page_of(PostFilter::All, page).await?;
            let descriptor = Page::new(Template::Index).with("page_obj", &page_obj)?;
            self.render(&descriptor)
        })
        .await
    }

    /// Posts of one group.
    pub async fn list_group_posts(&self, slug: &str, page: PageRequest) -> Result<Page, Error> {
        let group = self.find_group(slug).await?;
        let page_obj = self.page_of(PostFilter::Group(group.id()), page).await?;
        Page::new(Template::GroupList)
            .with("group", &group)?
            .with("posts", page_obj.items())?
            .with("page_obj", &page_obj)
    }

    /// An author's profile with their posts.
    pub async fn view_profile(
        &self,
        viewer: Option<&User>,
        username: &str,
        page: PageRequest,
    ) -> Result<Page, Error> {
        let author = self.find_author(username).await?;
        let page_obj = self.page_of(PostFilter::Author(author.id()), page).await?;
        let following = match viewer {
            Some(viewer) => self.is_following(viewer, &author).await?,
            None => false,
        };
        Page::new(Template::Profile)
            .with("author", &author)?
            .with("following", following)?
            .with("post_count", page_obj.count())?
            .with("page_obj", &page_obj)
    }

    /// A single post with its comments and an empty comment form.
    pub async fn view_post(&self, id: PostId) -> Result<Page, Error> {
        let post = self.find_post(id).await?;
        let comments = self
            .ports
            .comments
            .list_for_post(id)
            .await
            .map_err(map_comment_error)?;
        let post_count = self
            .ports
            .posts
            .count(PostFilter::Author(post.author().id()))
            .await
            .map_err(map_post_error)?;
        Page::new(Template::PostDetail)
            .with("image", post.image().map(PostImage::path))?
            .with("post", &post)?
            .with("post_count", post_count)?
            .with("comments", &comments)?
            .with("form", FormContext::new(CommentFormValues::default()))
    }

    /// Blank post creation form.
    pub async fn create_post_form(&self, user: &User) -> Result<Page, Error> {
        debug!(user = %user, "showing post creation form");
        let groups = self.all_groups().await?;
        Page::new(Template::PostCreate)
            .with("form", FormContext::new(PostFormValues::default()))?
            .with("groups", &groups)
    }

    /// Publish a post as `user`.
    ///
    /// Invalid input re-renders the form with field errors and stores
    /// nothing; success redirects to the author's profile.
    pub async fn create_post(&self, user: &User, form: PostForm) -> Result<Response, Error> {
        let groups = self.all_groups().await?;
        let valid = match validate_post(&form, &group_ids(&groups)) {
            Ok(valid) => valid,
            Err(errors) => {
                debug!(user = %user, "post form rejected");
                let context = FormContext {
                    values: form.values(),
                    errors,
                };
                return Ok(Page::new(Template::PostCreate)
                    .with("form", context)?
                    .with("groups", &groups)?
                    .into());
            }
        };

        let image = self.store_image(valid.image.as_ref()).await?;
        let created = self
            .ports
            .posts
            .create(&NewPost {
                author: user.id(),
                text: valid.text,
                pub_date: self.clock.utc(),
                group: valid.group,
                image: image.clone(),
            })
            .await
            .map_err(map_post_error);
        let post = match created {
            Ok(post) => post,
            Err(error) => {
                self.discard_image(image.as_ref()).await;
                return Err(error);
            }
        };
        info!(post_id = %post.id(), author = %user, "post created");
        Ok(Redirect::to_profile(user.username()).into())
    }

    /// Edit form pre-filled with the post's current values.
    ///
    /// Non-authors are silently redirected to the post.
    pub async fn edit_post_form(&self, user: &User, id: PostId) -> Result<Response, Error> {
        let post = self.find_post(id).await?;
        if !post.is_authored_by(user) {
            debug!(post_id = %id, user = %user, "edit refused: not the author");
            return Ok(Redirect::to_post(id).into());
        }
        let values = PostFormValues {
            text: post.text().as_ref().to_owned(),
            group: post
                .group()
                .map(|group| group.id().to_string())
                .unwrap_or_default(),
        };
        let groups = self.all_groups().await?;
        Ok(edit_page(&post, FormContext::new(values), &groups)?.into())
    }

    /// Replace a post's text, group and image.
    ///
    /// Non-authors are silently redirected to the post without any change;
    /// invalid input re-renders the edit form.
    pub async fn edit_post(
        &self,
        user: &User,
        id: PostId,
        form: PostForm,
    ) -> Result<Response, Error> {
        let post = self.find_post(id).await?;
        if !post.is_authored_by(user) {
            debug!(post_id = %id, user = %user, "edit refused: not the author");
            return Ok(Redirect::to_post(id).into());
        }

        let groups = self.all_groups().await?;
        let valid = match validate_post(&form, &group_ids(&groups)) {
            Ok(valid) => valid,
            Err(errors) => {
                let context = FormContext {
                    values: form.values(),
                    errors,
                };
                return Ok(edit_page(&post, context, &groups)?.into());
            }
        };

        let image = self.store_image(valid.image.as_ref()).await?;
        let update = PostUpdate {
            text: valid.text,
            group: valid.group,
            image: image.clone(),
        };
        let updated = self
            .ports
            .posts
            .update(id, &update)
            .await
            .map_err(map_post_error)
            .and_then(|found| {
                found.ok_or_else(|| Error::not_found(format!("post {id} not found")))
            });
        if let Err(error) = updated {
            self.discard_image(image.as_ref()).await;
            return Err(error);
        }
        info!(post_id = %id, author = %user, "post updated");
        Ok(Redirect::to_post(id).into())
    }

    /// Comment on a post as `user`.
    ///
    /// Invalid comments are dropped without feedback; the client is always
    /// sent back to the post.
    pub async fn add_comment(
        &self,
        user: &User,
        id: PostId,
        form: CommentForm,
    ) -> Result<Redirect, Error> {
        let post = self.find_post(id).await?;
        match validate_comment(&form) {
            Ok(valid) => {
                let comment = self
                    .ports
                    .comments
                    .create(&NewComment {
                        post: post.id(),
                        author: user.id(),
                        text: valid.text,
                        created: self.clock.utc(),
                    })
                    .await
                    .map_err(map_comment_error)?;
                info!(post_id = %id, comment_id = %comment.id(), author = %user, "comment added");
            }
            Err(_) => debug!(post_id = %id, user = %user, "empty comment dropped"),
        }
        Ok(Redirect::to_post(id))
    }

    /// Posts by every author `user` follows.
    pub async fn follow_feed(&self, user: &User, page: PageRequest) -> Result<Page, Error> {
        let page_obj = self.page_of(PostFilter::FollowedBy(user.id()), page).await?;
        Page::new(Template::Follow).with("page_obj", &page_obj)
    }

    /// Subscribe `user` to `username`. Following yourself is a no-op.
    pub async fn follow(&self, user: &User, username: &str) -> Result<Redirect, Error> {
        let author = self.find_author(username).await?;
        if let Ok(follow) = Follow::new(user.id(), author.id()) {
            let created = self
                .ports
                .follows
                .insert_if_absent(&follow)
                .await
                .map_err(map_follow_error)?;
            if created {
                info!(follower = %user, author = %author, "follow created");
            }
        }
        Ok(Redirect::to_profile(author.username()))
    }

    /// Unsubscribe `user` from `username`. Unfollowing yourself is a no-op.
    pub async fn unfollow(&self, user: &User, username: &str) -> Result<Redirect, Error> {
        let author = self.find_author(username).await?;
        if let Ok(follow) = Follow::new(user.id(), author.id()) {
            let removed = self
                .ports
                .follows
                .delete(&follow)
                .await
                .map_err(map_follow_error)?;
            if removed {
                info!(follower = %user, author = %author, "follow removed");
            }
        }
        Ok(Redirect::to_profile(author.username()))
    }

    /// Render a page descriptor through the configured renderer.
    pub fn render(&self, page: &Page) -> Result<RenderedPage, Error> {
        let body = self
            .ports
            .renderer
            .render(page)
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(RenderedPage {
            template: page.template(),
            body,
        })
    }

    /// Render the not-found page for `path`.
    pub fn render_not_found(&self, path: &str) -> Result<RenderedPage, Error> {
        self.render(&Page::new(Template::NotFound).with("path", path)?)
    }

    /// Drop every cached page.
    pub async fn clear_cache(&self) -> Result<(), Error> {
        self.ports
            .cache
            .clear()
            .await
            .map_err(|err| Error::service_unavailable(err.to_string()))?;
        info!("page cache cleared");
        Ok(())
    }

    /// Resolve a session username to a user. Unknown or malformed names
    /// resolve to `None`.
    pub async fn find_user(&self, username: &str) -> Result<Option<User>, Error> {
        let Ok(parsed) = Username::new(username) else {
            return Ok(None);
        };
        self.ports
            .users
            .find_by_username(&parsed)
            .await
            .map_err(map_user_error)
    }

    async fn page_of(
        &self,
        filter: PostFilter,
        request: PageRequest,
    ) -> Result<pagination::Page<Post>, Error> {
        let total = self
            .ports
            .posts
            .count(filter)
            .await
            .map_err(map_post_error)?;
        let window = PAGINATOR.window(total, request);
        let items = if window.limit() == 0 {
            Vec::new()
        } else {
            self.ports
                .posts
                .list(filter, window.offset(), window.limit())
                .await
                .map_err(map_post_error)?
        };
        Ok(pagination::Page::new(window, items))
    }

    async fn find_group(&self, slug: &str) -> Result<Group, Error> {
        let not_found = || Error::not_found(format!("group {slug} not found"));
        let parsed = GroupSlug::new(slug).map_err(|_| not_found())?;
        self.ports
            .groups
            .find_by_slug(&parsed)
            .await
            .map_err(map_group_error)?
            .ok_or_else(not_found)
    }

    async fn find_author(&self, username: &str) -> Result<User, Error> {
        self.find_user(username)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {username} not found")))
    }

    async fn find_post(&self, id: PostId) -> Result<Post, Error> {
        self.ports
            .posts
            .find_by_id(id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))
    }

    async fn all_groups(&self) -> Result<Vec<Group>, Error> {
        self.ports
            .groups
            .list_all()
            .await
            .map_err(map_group_error)
    }

    async fn is_following(&self, viewer: &User, author: &User) -> Result<bool, Error> {
        let Ok(follow) = Follow::new(viewer.id(), author.id()) else {
            return Ok(false);
        };
        self.ports
            .follows
            .exists(&follow)
            .await
            .map_err(map_follow_error)
    }

    async fn store_image(&self, image: Option<&ValidImage>) -> Result<Option<PostImage>, Error> {
        let Some(image) = image else {
            return Ok(None);
        };
        let stored = self
            .ports
            .images
            .store(image)
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
        debug!(path = stored.path(), "image stored");
        Ok(Some(stored))
    }

    /// Best-effort removal of an image whose post was never saved.
    async fn discard_image(&self, image: Option<&PostImage>) {
        let Some(image) = image else {
            return;
        };
        match self.ports.images.remove(image).await {
            Ok(()) => debug!(path = image.path(), "orphaned image removed"),
            Err(err) => warn!(path = image.path(), error = %err, "failed to remove orphaned image"),
        }
    }
}

fn group_ids(groups: &[Group]) -> Vec<GroupId> {
    groups.iter().map(Group::id).collect()
}

fn edit_page(
    post: &Post,
    form: FormContext<PostFormValues>,
    groups: &[Group],
) -> Result<Page, Error> {
    Page::new(Template::PostCreate)
        .with("form", form)?
        .with("groups", groups)?
        .with("post", post)?
        .with("post_id", post.id())?
        .with("is_edit", true)
}

#[cfg(test)]
#[path = "posts_service_tests.rs"]
mod tests;
