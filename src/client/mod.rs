//! Client-side nonce access.
//!
//! Browsers hide the `nonce` attribute of server-rendered elements before any
//! script runs, so content inserted by client code after the page loads has
//! to set the nonce again itself. The nonce is only handed out once hydration
//! has completed; before that, the markup must match what the server rendered.

pub mod dom;
pub mod hydration;

pub use dom::{Document, Element, MemoryDocument, NodeId};
pub use hydration::HydrationFlag;

use crate::error::CspError;
use crate::render::document::extract_payload;
use crate::render::payload::{use_nonce, RenderPayload};
use askama::Template;

/// The server-provided nonce, gated on hydration.
#[derive(Debug, Default)]
pub struct ClientNonce {
    server_nonce: Option<String>,
    hydration: HydrationFlag,
}

impl ClientNonce {
    pub fn new(server_nonce: Option<String>) -> Self {
        Self {
            server_nonce,
            hydration: HydrationFlag::new(),
        }
    }

    pub fn from_payload(payload: &RenderPayload) -> Self {
        Self::new(use_nonce(payload))
    }

    /// Reads the payload the server embedded in a rendered page.
    pub fn from_document_html(html: &str) -> Result<Self, CspError> {
        Ok(Self::from_payload(&extract_payload(html)?))
    }

    /// The post-first-render effect. Returns `true` the first time only.
    #[inline]
    pub fn hydrate(&self) -> bool {
        self.hydration.mark_hydrated()
    }

    #[inline]
    pub fn is_hydrated(&self) -> bool {
        self.hydration.is_hydrated()
    }

    /// `None` until hydration completes, then the server nonce if there was one.
    #[inline]
    pub fn nonce(&self) -> Option<&str> {
        if self.hydration.is_hydrated() {
            self.server_nonce.as_deref()
        } else {
            None
        }
    }
}

/// Owns a node that client code inserted into the body and removes it when
/// dropped, so re-running the effect never leaves stale nodes behind.
#[must_use = "dropping the guard removes the node immediately"]
#[derive(Debug)]
pub struct InlineNodeGuard<'d, D: Document + ?Sized> {
    document: &'d D,
    node: NodeId,
}

impl<D: Document + ?Sized> InlineNodeGuard<'_, D> {
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl<D: Document + ?Sized> Drop for InlineNodeGuard<'_, D> {
    fn drop(&mut self) {
        self.document.remove_from_body(self.node);
    }
}

/// Appends an inline `<script>` carrying the nonce. Does nothing (and returns
/// `None`) before hydration or when the page has no nonce.
pub fn attach_inline_script<'d, D: Document + ?Sized>(
    document: &'d D,
    client: &ClientNonce,
    code: &str,
) -> Option<InlineNodeGuard<'d, D>> {
    let nonce = client.nonce()?;

    let node = document.create_element("script");
    document.set_attribute(node, "nonce", nonce);
    document.set_text(node, code);
    document.append_to_body(node);

    Some(InlineNodeGuard { document, node })
}

#[derive(Template)]
#[template(source = r#"<style nonce="{{ nonce }}">{{ css|safe }}</style>"#, ext = "html")]
struct InlineStyleTemplate<'a> {
    nonce: &'a str,
    css: &'a str,
}

/// `<style nonce="…">` markup for client-rendered styles, once hydrated.
/// Returns `Ok(None)` before hydration or when the page has no nonce.
pub fn inline_style(client: &ClientNonce, css: &str) -> Result<Option<String>, CspError> {
    let Some(nonce) = client.nonce() else {
        return Ok(None);
    };
    // `</` would let the stylesheet close its own element.
    let css = css.replace("</", "<\\/");
    let template = InlineStyleTemplate { nonce, css: &css };
    Ok(Some(template.render()?))
}
