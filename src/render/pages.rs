use crate::client::{inline_style, ClientNonce};
use crate::error::CspError;
use askama::Template;

/// Styles the demo button injects once the client has hydrated.
pub const DEMO_BUTTON_CSS: &str = "
.btn {
  background-color: red;
  border: yellow dashed 3px;
  border-radius: 12px;
  color: white;
  padding: 15px 32px;
  text-align: center;
  cursor: pointer;
}
";

/// Script the demo appends to the body after hydration.
pub const DEMO_INLINE_SCRIPT: &str = "alert('inline script!')";

#[derive(Template)]
#[template(
    source = r#"{% if let Some(style) = style %}{{ style|safe }}{% endif %}<button class="btn flex mx-auto" type="button" data-demo="inline">Click Me</button>"#,
    ext = "html"
)]
struct InlineDemoTemplate {
    style: Option<String>,
}

#[derive(Template)]
#[template(path = "welcome.html")]
struct WelcomeTemplate {
    demo: String,
}

/// The inline demo. On the server the client has not hydrated, so only the
/// button is rendered; the nonce'd style appears once the client re-renders.
pub fn inline_demo(client: &ClientNonce) -> Result<String, CspError> {
    let template = InlineDemoTemplate {
        style: inline_style(client, DEMO_BUTTON_CSS)?,
    };
    Ok(template.render()?)
}

pub fn welcome(client: &ClientNonce) -> Result<String, CspError> {
    let template = WelcomeTemplate {
        demo: inline_demo(client)?,
    };
    Ok(template.render()?)
}
