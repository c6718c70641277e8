pub mod document;
pub mod error_boundary;
pub mod pages;
pub mod payload;

pub use document::{extract_payload, Layout, CLIENT_ENTRY};
pub use error_boundary::ErrorView;
pub use payload::{root_loader, use_nonce, RenderPayload, RootLoaderData};

use crate::core::config::Environment;
use crate::error::CspError;
use actix_web::{
    http::header::{HeaderValue, CONTENT_TYPE},
    HttpRequest, HttpResponse,
};

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Renders a route outcome into a full HTML response. A successful body is
/// wrapped in the layout with the request's nonce; a failure is rendered by
/// the error boundary and the error stays attached to the response so the
/// nonce middleware can log it.
pub fn render_route(
    req: &HttpRequest,
    env: Environment,
    outcome: Result<String, actix_web::Error>,
) -> Result<HttpResponse, CspError> {
    match outcome {
        Ok(body) => {
            let payload = RenderPayload::for_request(req)?;
            let html = Layout::new(env, &payload).render(&body)?;
            Ok(HttpResponse::Ok()
                .insert_header((CONTENT_TYPE, HTML_CONTENT_TYPE))
                .body(html))
        }
        Err(error) => {
            let view = ErrorView::from_actix_error(&error, env);
            let body = view.render_html()?;
            let payload = RenderPayload::for_error(view);
            let html = Layout::new(env, &payload).title("Error").render(&body)?;

            let mut response = HttpResponse::from_error(error).set_body(html);
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
            Ok(response.map_into_boxed_body())
        }
    }
}
