//! Transport-agnostic response descriptors returned by the posts service.
//!
//! A handler either asks for a template to be rendered with a context, or
//! for the client to be sent elsewhere. Adapters decide how either is
//! expressed on the wire.

use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use super::{Error, GroupSlug, PostId, Username};

/// Templates the service may ask to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Template {
    Index,
    GroupList,
    Profile,
    PostDetail,
    PostCreate,
    Follow,
    NotFound,
}

impl Template {
    /// Template path understood by renderers.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Index => "posts/index.html",
            Self::GroupList => "posts/group_list.html",
            Self::Profile => "posts/profile.html",
            Self::PostDetail => "posts/post_detail.html",
            Self::PostCreate => "posts/post_create.html",
            Self::Follow => "posts/follow.html",
            Self::NotFound => "core/404.html",
        }
    }
}

/// Template plus the context it is rendered with.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    template: Template,
    context: Map<String, Value>,
}

impl Page {
    /// Start a page with an empty context.
    pub fn new(template: Template) -> Self {
        Self {
            template,
            context: Map::new(),
        }
    }

    /// Add a context entry.
    pub fn with(mut self, key: &str, value: impl Serialize) -> Result<Self, Error> {
        let value = serde_json::to_value(value).map_err(|err| {
            Error::internal(format!("failed to serialise context entry `{key}`: {err}"))
        })?;
        self.context.insert(key.to_owned(), value);
        Ok(self)
    }

    pub fn template(&self) -> Template {
        self.template
    }

    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Look up a single context entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }
}

/// Output of a renderer, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub template: Template,
    pub body: String,
}

/// Instruction to send the client to another location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    location: String,
}

impl Redirect {
    /// Redirect to an arbitrary location.
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Redirect to an author's profile.
    pub fn to_profile(username: &Username) -> Self {
        Self::to(profile_path(username))
    }

    /// Redirect to a post's detail page.
    pub fn to_post(id: PostId) -> Self {
        Self::to(post_detail_path(id))
    }

    pub fn location(&self) -> &str {
        self.location.as_str()
    }
}

/// What a handler asks the adapter to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Page(Page),
    Redirect(Redirect),
}

impl From<Page> for Response {
    fn from(value: Page) -> Self {
        Self::Page(value)
    }
}

impl From<Redirect> for Response {
    fn from(value: Redirect) -> Self {
        Self::Redirect(value)
    }
}

/// Path of the index listing.
pub const INDEX_PATH: &str = "/";

/// Base against which site paths are assembled; only its path is kept.
const PATH_BASE: &str = "http://localhost/";

/// Path of an author's profile.
pub fn profile_path(username: &Username) -> String {
    site_path(&["profile", username.as_ref()])
}

/// Path of a post's detail page.
pub fn post_detail_path(id: PostId) -> String {
    format!("/posts/{id}/")
}

/// Path of a group listing.
pub fn group_path(slug: &GroupSlug) -> String {
    site_path(&["group", slug.as_ref()])
}

/// `/seg1/seg2/` with every segment percent-encoded, so non-ASCII
/// usernames still yield a valid `Location`.
fn site_path(segments: &[&str]) -> String {
    Url::parse(PATH_BASE)
        .ok()
        .and_then(|mut url| {
            url.path_segments_mut()
                .ok()?
                .pop_if_empty()
                .extend(segments)
                .push("");
            Some(url.path().to_owned())
        })
        .unwrap_or_else(|| format!("/{}/", segments.join("/")))
}
