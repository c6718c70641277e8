use crate::constants::RENDER_CONTEXT_GLOBAL;
use crate::core::config::Environment;
use crate::error::CspError;
use crate::render::payload::{use_nonce, RenderPayload};
use crate::utils::escape_json_for_script;
use askama::Template;

const FONT_STYLESHEET: &str = "https://fonts.googleapis.com/css2?family=Inter:ital,opsz,wght@0,14..32,100..900;1,14..32,100..900&display=swap";
pub const CLIENT_ENTRY: &str = "/assets/entry.client.js";
const SCROLL_RESTORATION: &str =
    "if(history.scrollRestoration){history.scrollRestoration=\"manual\"}";

#[derive(Template)]
#[template(path = "layout.html")]
struct LayoutTemplate<'a> {
    dev_meta: bool,
    nonce: Option<&'a str>,
    title: &'a str,
    font_stylesheet: &'a str,
    body: &'a str,
    scroll_restoration: &'a str,
    render_context_global: &'a str,
    payload_json: &'a str,
    client_entry: &'a str,
}

/// The document shell every page renders into. All inline and module
/// scripts carry the nonce read back from the render payload, so an error
/// render (which has no nonce) produces scripts the policy will refuse.
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    env: Environment,
    title: &'a str,
    payload: &'a RenderPayload,
}

impl<'a> Layout<'a> {
    pub fn new(env: Environment, payload: &'a RenderPayload) -> Self {
        Self {
            env,
            title: "CSP nonce demo",
            payload,
        }
    }

    #[inline]
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Renders the page around `body`, which must already be markup.
    pub fn render(&self, body: &str) -> Result<String, CspError> {
        let nonce = use_nonce(self.payload);
        let payload_json = escape_json_for_script(&self.payload.to_json()?);

        let template = LayoutTemplate {
            // The dev asset server looks for this tag to nonce the styles it injects.
            dev_meta: self.env.is_development(),
            nonce: nonce.as_deref(),
            title: self.title,
            font_stylesheet: FONT_STYLESHEET,
            body,
            scroll_restoration: SCROLL_RESTORATION,
            render_context_global: RENDER_CONTEXT_GLOBAL,
            payload_json: &payload_json,
            client_entry: CLIENT_ENTRY,
        };
        Ok(template.render()?)
    }
}

/// Pulls the render payload back out of a rendered document, the way the
/// client entry reads it on startup.
pub fn extract_payload(html: &str) -> Result<RenderPayload, CspError> {
    let marker = format!("window.{} = ", RENDER_CONTEXT_GLOBAL);
    let start = html
        .find(&marker)
        .map(|i| i + marker.len())
        .ok_or_else(|| CspError::RenderError("render payload not found".to_owned()))?;
    let end = html[start..]
        .find(";</script>")
        .map(|i| start + i)
        .ok_or_else(|| CspError::RenderError("render payload not terminated".to_owned()))?;
    RenderPayload::from_json(&html[start..end])
}
