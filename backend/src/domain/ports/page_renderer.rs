//! Port for turning page descriptors into HTML.
use crate::domain::Page;

use super::define_port_error;

define_port_error! {
    /// Errors raised by renderers.
    pub enum PageRenderError {
        /// The template could not be rendered with the given context.
        Template { message: String } => "page rendering failed: {message}",
    }
}

/// Renders [`Page`] descriptors to an HTML body.
#[cfg_attr(test, mockall::automock)]
pub trait PageRenderer: Send + Sync {
    /// Render `page` to a complete HTML document.
    fn render(&self, page: &Page) -> Result<String, PageRenderError>;
}
