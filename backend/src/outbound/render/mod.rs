//! Default page renderer.
//!
//! Template rendering proper lives outside this service. [`JsonPageRenderer`]
//! emits a minimal HTML document that names the template and embeds the
//! context as JSON, which front-end templates (or tests) can consume.

use crate::domain::Page;
use crate::domain::ports::{PageRenderError, PageRenderer};

/// Element id of the embedded context script.
pub const CONTEXT_ELEMENT_ID: &str = "page-context";

/// Renders pages as HTML shells carrying their JSON context.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPageRenderer;

impl PageRenderer for JsonPageRenderer {
    fn render(&self, page: &Page) -> Result<String, PageRenderError> {
        let template = page.template().name();
        let context = serde_json::to_string(page.context())
            .map_err(|err| PageRenderError::template(err.to_string()))?;
        Ok(format!(
            concat!(
                "<!DOCTYPE html>\n",
                "<html lang=\"en\">\n",
                "<head><meta charset=\"utf-8\"><title>{template}</title></head>\n",
                "<body data-template=\"{template}\">\n",
                "<script type=\"application/json\" id=\"{id}\">{context}</script>\n",
                "</body>\n",
                "</html>\n",
            ),
            template = template,
            id = CONTEXT_ELEMENT_ID,
            context = escape_script(&context),
        ))
    }
}

/// Make JSON safe to inline in a `<script>` element.
fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Extract the embedded context from a rendered document.
pub fn extract_context(html: &str) -> Option<serde_json::Value> {
    let marker = format!("id=\"{CONTEXT_ELEMENT_ID}\">");
    let start = html.find(&marker)? + marker.len();
    let rest = html.get(start..)?;
    let end = rest.find("</script>")?;
    serde_json::from_str(rest.get(..end)?).ok()
}
