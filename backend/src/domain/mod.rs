//! Domain primitives, form validation and the posts service.
//!
//! Purpose: define the entities of the blogging site (users, groups, posts,
//! comments, follows), their validated parts, and the orchestration of
//! every user-facing operation. Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failures.
//! - User, Group, Post, Comment, Follow: entities.
//! - PostForm, CommentForm, validate_post, validate_comment: form input.
//! - Page, Redirect, Response, RenderedPage: response descriptors.
//! - PostsService: the ten user-facing operations.

pub mod comment;
pub mod error;
pub mod follow;
pub mod forms;
pub mod group;
pub mod page_cache;
pub mod ports;
pub mod post;
pub mod posts_service;
pub mod response;
mod slug;
pub mod trace_id;
pub mod user;

pub use self::comment::{Comment, CommentId, CommentText, EmptyCommentText, NewComment};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::follow::{Follow, SelfFollow};
pub use self::forms::{
    CommentForm, FormErrors, PostForm, PostFormValues, UploadedImage, ValidComment, ValidImage,
    ValidPost, validate_comment, validate_post,
};
pub use self::group::{Group, GroupId, GroupSlug, GroupValidationError};
pub use self::page_cache::{INDEX_CACHE_KEY, INDEX_CACHE_TTL};
pub use self::post::{
    NewPost, POST_IMAGE_DIR, Post, PostFilter, PostId, PostImage, PostText, PostUpdate,
    PostValidationError,
};
pub use self::posts_service::{PAGE_SIZE, PostsPorts, PostsService};
pub use self::response::{Page, Redirect, RenderedPage, Response, Template};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserId, UserValidationError, Username};

/// Convenient result alias for handlers and services.
///
/// # Examples
/// ```
/// use yatube::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("nothing here"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
